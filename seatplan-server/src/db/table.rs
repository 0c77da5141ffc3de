//! Seating Table Repository

use shared::error::ErrorCode;
use shared::models::{DEFAULT_MAP_COORD, Plan, SeatingTable, TableCreate};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ServiceResult;
use crate::validation::normalize_table_name;

/// Tables of one plan in id (creation) order
pub async fn list(pool: &SqlitePool, user_id: i64, plan: Plan) -> Result<Vec<SeatingTable>, sqlx::Error> {
    sqlx::query_as::<_, SeatingTable>(
        "SELECT id, name, shape, plan FROM seating_table WHERE user_id = ? AND plan = ? ORDER BY id",
    )
    .bind(user_id)
    .bind(plan)
    .fetch_all(pool)
    .await
}

pub async fn find(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Option<SeatingTable>, sqlx::Error> {
    sqlx::query_as::<_, SeatingTable>(
        "SELECT id, name, shape, plan FROM seating_table WHERE id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

/// Create the table together with its default map placement
pub async fn create(pool: &SqlitePool, user_id: i64, data: &TableCreate) -> ServiceResult<SeatingTable> {
    let name = normalize_table_name(&data.name)?;

    let mut tx = pool.begin().await?;
    let table = sqlx::query_as::<_, SeatingTable>(
        "INSERT INTO seating_table (user_id, name, shape, plan) VALUES (?, ?, ?, ?)
         RETURNING id, name, shape, plan",
    )
    .bind(user_id)
    .bind(&name)
    .bind(data.shape)
    .bind(data.plan)
    .fetch_one(&mut *tx)
    .await?;

    super::map_table::insert(
        &mut tx,
        user_id,
        &table,
        DEFAULT_MAP_COORD,
        DEFAULT_MAP_COORD,
        0,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(table_id = table.id, plan = %table.plan, shape = ?table.shape, "Table created");
    Ok(table)
}

pub async fn rename(pool: &SqlitePool, user_id: i64, id: i64, name: &str) -> ServiceResult<SeatingTable> {
    let name = normalize_table_name(name)?;
    sqlx::query_as::<_, SeatingTable>(
        "UPDATE seating_table SET name = ? WHERE id = ? AND user_id = ?
         RETURNING id, name, shape, plan",
    )
    .bind(&name)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ErrorCode::TableNotFound.into())
}

/// Delete the table, every seat at it and its map placement in one transaction
///
/// Whole buckets disappear, so no other bucket needs compaction.
pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    let table = find(&mut tx, user_id, id)
        .await?
        .ok_or(ErrorCode::TableNotFound)?;

    let seats = sqlx::query("DELETE FROM seat_assignment WHERE table_id = ?")
        .bind(table.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM map_table WHERE table_id = ?")
        .bind(table.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM seating_table WHERE id = ?")
        .bind(table.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(table_id = table.id, plan = %table.plan, seats_released = seats, "Table deleted");
    Ok(())
}
