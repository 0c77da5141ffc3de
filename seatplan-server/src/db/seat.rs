//! Seat Assignment Repository
//!
//! Row-level access only. Bucket invariants (one seat per guest per plan,
//! dense positions) are kept by the seating engine, which calls these inside
//! a single transaction.

use shared::models::{Plan, SeatAssignment, Side};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, guest_id, table_id, side, position, plan";

pub async fn find_for_guest(
    conn: &mut SqliteConnection,
    guest_id: i64,
    plan: Plan,
) -> Result<Option<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "SELECT {COLUMNS} FROM seat_assignment WHERE guest_id = ? AND plan = ?"
    ))
    .bind(guest_id)
    .bind(plan)
    .fetch_optional(conn)
    .await
}

/// Seat row by id, scoped to the owner of its table
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
    id: i64,
) -> Result<Option<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(
        "SELECT s.id, s.guest_id, s.table_id, s.side, s.position, s.plan
         FROM seat_assignment s
         JOIN seating_table t ON t.id = s.table_id
         WHERE s.id = ? AND t.user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

pub async fn find_at(
    conn: &mut SqliteConnection,
    table_id: i64,
    side: Side,
    position: i32,
    plan: Plan,
) -> Result<Option<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "SELECT {COLUMNS} FROM seat_assignment
         WHERE table_id = ? AND side = ? AND position = ? AND plan = ?
         ORDER BY id LIMIT 1"
    ))
    .bind(table_id)
    .bind(side)
    .bind(position)
    .bind(plan)
    .fetch_optional(conn)
    .await
}

/// Occupants of one bucket by ascending position
pub async fn list_bucket(
    conn: &mut SqliteConnection,
    table_id: i64,
    side: Side,
    plan: Plan,
) -> Result<Vec<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "SELECT {COLUMNS} FROM seat_assignment
         WHERE table_id = ? AND side = ? AND plan = ?
         ORDER BY position, id"
    ))
    .bind(table_id)
    .bind(side)
    .bind(plan)
    .fetch_all(conn)
    .await
}

pub async fn count_bucket(
    conn: &mut SqliteConnection,
    table_id: i64,
    side: Side,
    plan: Plan,
) -> Result<i32, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM seat_assignment WHERE table_id = ? AND side = ? AND plan = ?",
    )
    .bind(table_id)
    .bind(side)
    .bind(plan)
    .fetch_one(conn)
    .await?;
    Ok(i32::try_from(count).unwrap_or(i32::MAX))
}

pub async fn occupied_positions(
    conn: &mut SqliteConnection,
    table_id: i64,
    side: Side,
    plan: Plan,
) -> Result<Vec<i32>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT position FROM seat_assignment
         WHERE table_id = ? AND side = ? AND plan = ?
         ORDER BY position",
    )
    .bind(table_id)
    .bind(side)
    .bind(plan)
    .fetch_all(conn)
    .await
}

/// Every seat of the owner's tables in `plan`
pub async fn list_for_plan(
    pool: &SqlitePool,
    user_id: i64,
    plan: Plan,
) -> Result<Vec<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(
        "SELECT s.id, s.guest_id, s.table_id, s.side, s.position, s.plan
         FROM seat_assignment s
         JOIN seating_table t ON t.id = s.table_id
         WHERE t.user_id = ? AND s.plan = ?
         ORDER BY s.table_id, s.side, s.position",
    )
    .bind(user_id)
    .bind(plan)
    .fetch_all(pool)
    .await
}

pub async fn list_for_table(
    conn: &mut SqliteConnection,
    table_id: i64,
    plan: Plan,
) -> Result<Vec<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "SELECT {COLUMNS} FROM seat_assignment
         WHERE table_id = ? AND plan = ?
         ORDER BY side, position"
    ))
    .bind(table_id)
    .bind(plan)
    .fetch_all(conn)
    .await
}

pub async fn insert(
    conn: &mut SqliteConnection,
    guest_id: i64,
    table_id: i64,
    side: Side,
    position: i32,
    plan: Plan,
) -> Result<SeatAssignment, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "INSERT INTO seat_assignment (guest_id, table_id, side, position, plan)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {COLUMNS}"
    ))
    .bind(guest_id)
    .bind(table_id)
    .bind(side)
    .bind(position)
    .bind(plan)
    .fetch_one(conn)
    .await
}

/// Remove the guest's seat in `plan` without touching the rest of the bucket
pub async fn delete_for_guest(
    conn: &mut SqliteConnection,
    guest_id: i64,
    plan: Plan,
) -> Result<Option<SeatAssignment>, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "DELETE FROM seat_assignment WHERE guest_id = ? AND plan = ? RETURNING {COLUMNS}"
    ))
    .bind(guest_id)
    .bind(plan)
    .fetch_optional(conn)
    .await
}

/// Shift every seat after `position` one step down, closing the gap
pub async fn compact_after(
    conn: &mut SqliteConnection,
    table_id: i64,
    side: Side,
    plan: Plan,
    position: i32,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE seat_assignment SET position = position - 1
         WHERE table_id = ? AND side = ? AND plan = ? AND position > ?",
    )
    .bind(table_id)
    .bind(side)
    .bind(plan)
    .bind(position)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected())
}

/// Put an existing seat row at another (table, side, position)
pub async fn set_seat(
    conn: &mut SqliteConnection,
    id: i64,
    table_id: i64,
    side: Side,
    position: i32,
) -> Result<SeatAssignment, sqlx::Error> {
    sqlx::query_as::<_, SeatAssignment>(&format!(
        "UPDATE seat_assignment SET table_id = ?, side = ?, position = ? WHERE id = ?
         RETURNING {COLUMNS}"
    ))
    .bind(table_id)
    .bind(side)
    .bind(position)
    .bind(id)
    .fetch_one(conn)
    .await
}
