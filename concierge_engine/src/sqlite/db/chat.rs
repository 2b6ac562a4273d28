use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{Booking, MessageDetail, NewMessage};

const MESSAGE_DETAIL_SELECT: &str = r#"
    SELECT
        cm.*,
        u.first_name AS sender_first_name,
        u.last_name AS sender_last_name,
        u.role AS sender_role
    FROM chat_messages cm
    JOIN users u ON cm.sender_id = u.id
"#;

/// Fetches the booking only if the user is its guest or hosts its property. One query answers
/// "does it exist" and "is it yours" at the same time, so the caller cannot tell the two apart.
pub async fn fetch_booking_for_user(
    booking_id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Booking>, sqlx::Error> {
    let booking = sqlx::query_as(
        r#"
            SELECT * FROM bookings
            WHERE id = $1
              AND (guest_id = $2 OR property_id IN (SELECT id FROM properties WHERE host_id = $2))
        "#,
    )
    .bind(booking_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(booking)
}

pub async fn insert_message(message: NewMessage, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO chat_messages (booking_id, sender_id, receiver_id, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id;
        "#,
    )
    .bind(message.booking_id)
    .bind(message.sender_id)
    .bind(message.receiver_id)
    .bind(&message.message)
    .fetch_one(conn)
    .await?;
    debug!("💬️ Message stored with id {id} for booking #{}", message.booking_id);
    Ok(id)
}

pub async fn fetch_message_detail(id: i64, conn: &mut SqliteConnection) -> Result<Option<MessageDetail>, sqlx::Error> {
    let message = sqlx::query_as(&format!("{MESSAGE_DETAIL_SELECT} WHERE cm.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(message)
}

/// The booking's conversation, oldest first.
pub async fn fetch_messages(booking_id: i64, conn: &mut SqliteConnection) -> Result<Vec<MessageDetail>, sqlx::Error> {
    let messages = sqlx::query_as(&format!("{MESSAGE_DETAIL_SELECT} WHERE cm.booking_id = $1 ORDER BY cm.created_at ASC"))
        .bind(booking_id)
        .fetch_all(conn)
        .await?;
    Ok(messages)
}

/// Marks every message in the booking addressed to the receiver as read.
pub async fn mark_messages_read(
    booking_id: i64,
    receiver_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE chat_messages SET is_read = TRUE WHERE booking_id = $1 AND receiver_id = $2")
        .bind(booking_id)
        .bind(receiver_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
