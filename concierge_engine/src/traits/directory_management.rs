use thiserror::Error;

use crate::{
    db_types::{Partner, PropertyContext, PropertyLocation, Role, RoleStatistics, ServiceDetail, ServiceType, User},
    order_objects::ServiceQueryFilter,
};

#[derive(Debug, Clone, Error)]
pub enum DirectoryApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Service #{0} not found")]
    ServiceNotFound(i64),
    #[error("Property #{0} not found")]
    PropertyNotFound(i64),
}

impl From<sqlx::Error> for DirectoryApiError {
    fn from(e: sqlx::Error) -> Self {
        DirectoryApiError::DatabaseError(e.to_string())
    }
}

/// Read-only lookups over the catalogue tables: services, partners, users and properties.
/// Nothing in this trait mutates state.
#[allow(async_fn_in_trait)]
pub trait DirectoryManagement {
    /// Available services matching the filter, joined with partner contact details, ordered by
    /// name.
    async fn fetch_services(&self, filter: ServiceQueryFilter) -> Result<Vec<ServiceDetail>, DirectoryApiError>;

    async fn fetch_service(&self, id: i64) -> Result<Option<ServiceDetail>, DirectoryApiError>;

    /// Active partners, optionally narrowed to one service type, ordered by name.
    async fn fetch_partners(&self, service_type: Option<ServiceType>) -> Result<Vec<Partner>, DirectoryApiError>;

    /// Users, optionally narrowed to one role, newest first.
    async fn fetch_users(&self, role: Option<Role>) -> Result<Vec<User>, DirectoryApiError>;

    /// Role counts over the *whole* user table, regardless of any list filter.
    async fn role_statistics(&self) -> Result<RoleStatistics, DirectoryApiError>;

    async fn fetch_property_location(&self, property_id: i64) -> Result<Option<PropertyLocation>, DirectoryApiError>;

    async fn fetch_property_context(&self, property_id: i64) -> Result<Option<PropertyContext>, DirectoryApiError>;
}
