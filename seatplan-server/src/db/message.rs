//! Message Repository

use shared::models::Message;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, user_id, admin_id, body, sent_at, is_read";

/// The organizer's thread, oldest first
pub async fn list_thread(pool: &SqlitePool, user_id: i64) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as::<_, Message>(&format!(
        "SELECT {COLUMNS} FROM message WHERE user_id = ? ORDER BY sent_at, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Append to `user_id`'s thread; `admin_id` is set when an admin writes
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    admin_id: Option<i64>,
    body: &str,
    now: i64,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, Message>(&format!(
        "INSERT INTO message (user_id, admin_id, body, sent_at) VALUES (?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(admin_id)
    .bind(body)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Delete a message the requester owns the thread of or sent as admin
pub async fn delete(pool: &SqlitePool, requester: i64, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM message WHERE id = ? AND (user_id = ? OR admin_id = ?)")
        .bind(id)
        .bind(requester)
        .bind(requester)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Mark every admin reply in the thread as read
pub async fn mark_read(pool: &SqlitePool, user_id: i64) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE message SET is_read = 1
         WHERE user_id = ? AND admin_id IS NOT NULL AND is_read = 0",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
