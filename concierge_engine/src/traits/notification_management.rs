use thiserror::Error;

use crate::db_types::{NewNotification, Notification};

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Notification #{0} not found")]
    NotFound(i64),
}

impl From<sqlx::Error> for NotificationApiError {
    fn from(e: sqlx::Error) -> Self {
        NotificationApiError::DatabaseError(e.to_string())
    }
}

/// Storage behaviour for the user-scoped notification feed. Notifications are written by other
/// parts of the system as a side effect of domain events and polled by clients.
#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, NotificationApiError>;

    /// The user's notifications, newest first, capped at `limit` rows.
    async fn fetch_notifications_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationApiError>;

    /// Marks one notification as read, scoped to the owning user. Returns the rows updated (0 when
    /// the id does not exist or belongs to someone else).
    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<u64, NotificationApiError>;

    /// Marks all of the user's unread notifications as read. Returns the rows updated.
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64, NotificationApiError>;
}
