//! Map placement API (canvas position and rotation only)

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use shared::models::{MapTable, MapTableCreate, MapTableUpdate};

use super::{ApiResult, CreatedResult, PlanQuery, created};
use crate::auth::CurrentUser;
use crate::db::map_table;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/map-tables", get(list).post(create))
        .route("/api/map-tables/{id}", put(update).delete(delete))
}

/// GET /api/map-tables?plan=
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<MapTable>> {
    let plan = query.plan()?;
    Ok(Json(map_table::list(&state.db.pool, user.id, plan).await?))
}

/// POST /api/map-tables
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<MapTableCreate>,
) -> CreatedResult<MapTable> {
    created(map_table::create(&state.db.pool, user.id, &payload).await?)
}

/// PUT /api/map-tables/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<MapTableUpdate>,
) -> ApiResult<MapTable> {
    Ok(Json(map_table::update(&state.db.pool, user.id, id, &payload).await?))
}

/// DELETE /api/map-tables/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    map_table::delete(&state.db.pool, user.id, id).await?;
    Ok(Json(true))
}
