use thiserror::Error;

use crate::db_types::{Booking, MessageDetail, NewMessage};

#[derive(Debug, Clone, Error)]
pub enum ChatApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Covers both "no such booking" and "booking belongs to someone else", so a denied caller
    /// cannot tell whether the booking exists.
    #[error("Booking not found or access denied")]
    BookingNotFound,
}

impl From<sqlx::Error> for ChatApiError {
    fn from(e: sqlx::Error) -> Self {
        ChatApiError::DatabaseError(e.to_string())
    }
}

/// Storage behaviour for the persistent chat log.
///
/// The log is the source of truth for conversations. The socket relay never reads or writes it;
/// delivery over the relay is a best-effort extra on top of these durable rows.
#[allow(async_fn_in_trait)]
pub trait ChatManagement {
    /// Fetches the booking only if `user_id` is its guest or the host of its property.
    /// `None` means "not found or not yours" without distinguishing the two.
    async fn fetch_booking_for_user(&self, booking_id: i64, user_id: i64) -> Result<Option<Booking>, ChatApiError>;

    /// Persists a message and returns it enriched with the sender's name and role.
    async fn insert_message(&self, message: NewMessage) -> Result<MessageDetail, ChatApiError>;

    /// The booking's full conversation, oldest first, each row joined with sender details.
    async fn fetch_messages(&self, booking_id: i64) -> Result<Vec<MessageDetail>, ChatApiError>;

    /// Marks every message in the booking addressed to `receiver_id` as read. Messages addressed
    /// to the other party are untouched. Returns the number of rows updated.
    async fn mark_messages_read(&self, booking_id: i64, receiver_id: i64) -> Result<u64, ChatApiError>;
}
