use std::fmt::Debug;

use log::*;
use serde::Serialize;

use crate::{
    db_types::{Partner, PropertyContext, PropertyLocation, Role, RoleStatistics, ServiceDetail, ServiceType, User},
    order_objects::ServiceQueryFilter,
    traits::{DirectoryApiError, DirectoryManagement},
};

/// The user list plus the always-unfiltered role statistics, as one payload.
#[derive(Debug, Clone, Serialize)]
pub struct UserReport {
    pub users: Vec<User>,
    pub statistics: RoleStatistics,
}

/// Read-only catalogue queries: services, partners, users, and the property lookups consumed by
/// the weather and assistant integrations.
pub struct DirectoryApi<B> {
    db: B,
}

impl<B> Debug for DirectoryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DirectoryApi")
    }
}

impl<B> DirectoryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> DirectoryApi<B>
where B: DirectoryManagement
{
    pub async fn services(&self, filter: ServiceQueryFilter) -> Result<Vec<ServiceDetail>, DirectoryApiError> {
        self.db.fetch_services(filter).await
    }

    pub async fn service(&self, id: i64) -> Result<ServiceDetail, DirectoryApiError> {
        self.db.fetch_service(id).await?.ok_or(DirectoryApiError::ServiceNotFound(id))
    }

    pub async fn partners(&self, service_type: Option<ServiceType>) -> Result<Vec<Partner>, DirectoryApiError> {
        self.db.fetch_partners(service_type).await
    }

    /// The user list for the admin dashboard. The statistics block always covers the full table,
    /// even when the list itself is narrowed to one role.
    pub async fn users_with_statistics(&self, role: Option<Role>) -> Result<UserReport, DirectoryApiError> {
        let users = self.db.fetch_users(role).await?;
        let statistics = self.db.role_statistics().await?;
        trace!("👥️ Listed {} users ({} total in system)", users.len(), statistics.total);
        Ok(UserReport { users, statistics })
    }

    /// The property's coordinates, for the weather provider. Errors when the property is unknown;
    /// the caller decides what missing coordinates mean.
    pub async fn property_location(&self, property_id: i64) -> Result<PropertyLocation, DirectoryApiError> {
        self.db
            .fetch_property_location(property_id)
            .await?
            .ok_or(DirectoryApiError::PropertyNotFound(property_id))
    }

    /// The property context string handed to the assistant provider, if the property exists.
    pub async fn property_context(&self, property_id: i64) -> Result<Option<PropertyContext>, DirectoryApiError> {
        self.db.fetch_property_context(property_id).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
