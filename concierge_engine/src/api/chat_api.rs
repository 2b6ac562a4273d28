use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{MessageDetail, NewMessage},
    traits::{ChatApiError, ChatManagement},
};

/// `ChatApi` guards the persistent message log behind the booking access check: every read and
/// write first proves that the acting user is the booking's guest or the host of its property.
///
/// Access failures surface as [`ChatApiError::BookingNotFound`] rather than a distinct "forbidden"
/// outcome, so callers cannot probe for the existence of other people's bookings.
pub struct ChatApi<B> {
    db: B,
}

impl<B> Debug for ChatApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChatApi")
    }
}

impl<B> ChatApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ChatApi<B>
where B: ChatManagement
{
    /// Persists a message from `sender_id` into the booking's log and returns it enriched with the
    /// sender's display name and role.
    ///
    /// Persistence is deliberately independent of the socket relay: delivering the new message to
    /// connected peers is the client's job, and a peer that misses the broadcast will see the row
    /// on its next fetch.
    pub async fn post_message(
        &self,
        sender_id: i64,
        booking_id: i64,
        receiver_id: i64,
        body: String,
    ) -> Result<MessageDetail, ChatApiError> {
        self.require_booking_access(booking_id, sender_id).await?;
        let message = NewMessage { booking_id, sender_id, receiver_id, message: body };
        let detail = self.db.insert_message(message).await?;
        debug!("💬️ Message #{} stored for booking #{booking_id}", detail.message.id);
        Ok(detail)
    }

    /// The booking's conversation, oldest first.
    ///
    /// Fetching *is* the read receipt: every message addressed to the requester is marked read as
    /// a side effect, before the rows are read, so the returned view already reflects it.
    /// Messages addressed to the other party are untouched.
    pub async fn conversation(&self, booking_id: i64, requester_id: i64) -> Result<Vec<MessageDetail>, ChatApiError> {
        self.require_booking_access(booking_id, requester_id).await?;
        let marked = self.db.mark_messages_read(booking_id, requester_id).await?;
        if marked > 0 {
            trace!("💬️ Marked {marked} messages in booking #{booking_id} as read for user #{requester_id}");
        }
        self.db.fetch_messages(booking_id).await
    }

    async fn require_booking_access(&self, booking_id: i64, user_id: i64) -> Result<(), ChatApiError> {
        match self.db.fetch_booking_for_user(booking_id, user_id).await? {
            Some(_) => Ok(()),
            None => {
                debug!("💬️ User #{user_id} denied access to booking #{booking_id}");
                Err(ChatApiError::BookingNotFound)
            },
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
