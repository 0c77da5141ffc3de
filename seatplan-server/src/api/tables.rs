//! Seating table API

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use shared::models::{SeatingTable, TableCreate, TableUpdate};

use super::{ApiResult, CreatedResult, PlanQuery, created};
use crate::auth::CurrentUser;
use crate::db::table;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tables", get(list).post(create))
        .route("/api/tables/{id}", put(update).delete(delete))
}

/// GET /api/tables?plan=
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<SeatingTable>> {
    let plan = query.plan()?;
    Ok(Json(table::list(&state.db.pool, user.id, plan).await?))
}

/// POST /api/tables
///
/// Also places the table on the map at the default spot.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<TableCreate>,
) -> CreatedResult<SeatingTable> {
    created(table::create(&state.db.pool, user.id, &payload).await?)
}

/// PUT /api/tables/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TableUpdate>,
) -> ApiResult<SeatingTable> {
    Ok(Json(table::rename(&state.db.pool, user.id, id, &payload.name).await?))
}

/// DELETE /api/tables/{id}
///
/// Seats at the table and its map placement go with it. Holds the seating
/// writer lock so no seat mutation interleaves.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    state.engine.delete_table(user.id, id).await?;
    Ok(Json(true))
}
