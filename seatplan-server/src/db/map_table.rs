//! Map Table Repository
//!
//! Canvas placement of tables. Purely presentational; seating never reads it.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    DEFAULT_MAP_COORD, MapTable, MapTableCreate, MapTableUpdate, Plan, SeatingTable, TableShape,
};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ServiceResult;
use crate::validation::validate_rotation;

const COLUMNS: &str = "id, table_id, plan, x, y, rotation";

pub async fn list(pool: &SqlitePool, user_id: i64, plan: Plan) -> Result<Vec<MapTable>, sqlx::Error> {
    sqlx::query_as::<_, MapTable>(&format!(
        "SELECT {COLUMNS} FROM map_table WHERE user_id = ? AND plan = ? ORDER BY id"
    ))
    .bind(user_id)
    .bind(plan)
    .fetch_all(pool)
    .await
}

/// Insert a placement for `table`; the plan is inherited from the table
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    table: &SeatingTable,
    x: f64,
    y: f64,
    rotation: i32,
) -> Result<MapTable, sqlx::Error> {
    sqlx::query_as::<_, MapTable>(&format!(
        "INSERT INTO map_table (user_id, table_id, plan, x, y, rotation) VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(table.id)
    .bind(table.plan)
    .bind(x)
    .bind(y)
    .bind(rotation)
    .fetch_one(conn)
    .await
}

fn check_rotation(shape: TableShape, rotation: i32) -> Result<(), AppError> {
    validate_rotation(rotation)?;
    if shape.is_round() && rotation != 0 {
        return Err(AppError::new(ErrorCode::RoundTableNotRotatable));
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, user_id: i64, data: &MapTableCreate) -> ServiceResult<MapTable> {
    let mut tx = pool.begin().await?;
    let table = super::table::find(&mut tx, user_id, data.table_id)
        .await?
        .ok_or(ErrorCode::TableNotFound)?;

    let rotation = data.rotation.unwrap_or(0);
    check_rotation(table.shape, rotation)?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM map_table WHERE table_id = ?")
        .bind(table.id)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(AppError::already_exists("Map table").into());
    }

    let placement = insert(
        &mut tx,
        user_id,
        &table,
        data.x.unwrap_or(DEFAULT_MAP_COORD),
        data.y.unwrap_or(DEFAULT_MAP_COORD),
        rotation,
    )
    .await?;
    tx.commit().await?;
    Ok(placement)
}

/// Update only the provided fields; at least one is required
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    data: &MapTableUpdate,
) -> ServiceResult<MapTable> {
    if data.is_empty() {
        return Err(AppError::validation("No fields to update").into());
    }

    let mut tx = pool.begin().await?;
    let shape: TableShape = sqlx::query_scalar(
        "SELECT t.shape FROM map_table m JOIN seating_table t ON t.id = m.table_id
         WHERE m.id = ? AND m.user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ErrorCode::MapTableNotFound)?;

    if let Some(rotation) = data.rotation {
        check_rotation(shape, rotation)?;
    }

    let placement = sqlx::query_as::<_, MapTable>(&format!(
        "UPDATE map_table
         SET x = COALESCE(?, x), y = COALESCE(?, y), rotation = COALESCE(?, rotation)
         WHERE id = ? AND user_id = ?
         RETURNING {COLUMNS}"
    ))
    .bind(data.x)
    .bind(data.y)
    .bind(data.rotation)
    .bind(id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(placement)
}

pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM map_table WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(ErrorCode::MapTableNotFound.into());
    }
    Ok(())
}
