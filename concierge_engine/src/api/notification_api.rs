use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewNotification, Notification},
    traits::{NotificationApiError, NotificationManagement},
};

/// Notifications fetched per poll. Clients poll rather than subscribe, so the feed is capped.
const NOTIFICATION_PAGE_SIZE: i64 = 50;

/// The user-scoped notification feed: created by other subsystems as a side effect of domain
/// events, polled and acknowledged here.
pub struct NotificationApi<B> {
    db: B,
}

impl<B> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<B> NotificationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement
{
    pub async fn create(&self, notification: NewNotification) -> Result<Notification, NotificationApiError> {
        let stored = self.db.insert_notification(notification).await?;
        debug!("🔔️ Notification #{} created for user #{}", stored.id, stored.user_id);
        Ok(stored)
    }

    /// The user's most recent notifications, optionally narrowed to unread ones.
    pub async fn for_user(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>, NotificationApiError> {
        self.db.fetch_notifications_for_user(user_id, unread_only, NOTIFICATION_PAGE_SIZE).await
    }

    /// Marks one notification read. The update is scoped to the requesting user, so acknowledging
    /// someone else's notification reports not-found.
    pub async fn mark_read(&self, id: i64, user_id: i64) -> Result<(), NotificationApiError> {
        let updated = self.db.mark_notification_read(id, user_id).await?;
        if updated == 0 {
            return Err(NotificationApiError::NotFound(id));
        }
        Ok(())
    }

    /// Marks the user's entire feed read. Returns how many notifications were affected.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        let updated = self.db.mark_all_notifications_read(user_id).await?;
        trace!("🔔️ Marked {updated} notifications read for user #{user_id}");
        Ok(updated)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
