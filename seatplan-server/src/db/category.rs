//! Category Repository

use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    data: &CategoryCreate,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "INSERT INTO category (user_id, name) VALUES (?, ?) RETURNING id, name",
    )
    .bind(user_id)
    .bind(data.name.trim())
    .fetch_one(pool)
    .await
}

/// Returns `None` when the category does not exist or belongs to someone else
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    data: &CategoryUpdate,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "UPDATE category SET name = ? WHERE id = ? AND user_id = ? RETURNING id, name",
    )
    .bind(data.name.trim())
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Guests of a deleted category keep existing with `category_id = NULL`
pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
