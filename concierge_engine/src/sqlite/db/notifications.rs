use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{NewNotification, Notification};

pub async fn insert_notification(
    notification: NewNotification,
    conn: &mut SqliteConnection,
) -> Result<Notification, sqlx::Error> {
    let notification = sqlx::query_as(
        r#"
            INSERT INTO notifications (user_id, notification_type, title, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(notification.user_id)
    .bind(&notification.notification_type)
    .bind(&notification.title)
    .bind(&notification.message)
    .fetch_one(conn)
    .await?;
    Ok(notification)
}

/// The user's notifications, newest first, capped at `limit`.
pub async fn fetch_notifications_for_user(
    user_id: i64,
    unread_only: bool,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM notifications WHERE user_id = ");
    builder.push_bind(user_id);
    if unread_only {
        builder.push(" AND is_read = FALSE");
    }
    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(limit);
    let notifications = builder.build_query_as::<Notification>().fetch_all(conn).await?;
    Ok(notifications)
}

pub async fn mark_notification_read(id: i64, user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn mark_all_notifications_read(user_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
