//! Table layout API: seat assignments
//!
//! Every mutation goes through [`SeatingEngine`](crate::seating::SeatingEngine).
//! The four DELETE routes are kept for client compatibility and all unassign
//! the same way; compaction is always done server-side.

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Serialize;
use shared::models::{MoveOutcome, SeatAssignment, SeatRequest, SwapRequest};

use super::{ApiResult, CreatedResult, PlanQuery, created};
use crate::auth::CurrentUser;
use crate::db::seat;
use crate::seating::Destination;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/table-layouts", get(list).post(assign))
        .route("/api/table-layouts/{id}", put(update_seat).delete(unassign))
        .route("/api/table-layouts/round/{id_guest}", delete(unassign))
        .route("/api/table-layouts/round/drop/{id_guest}", delete(unassign))
        .route("/api/table-layouts/rect/drop/{id_guest}", delete(unassign))
        .route("/api/table-layouts/rect/drop/change", put(rect_drop_change))
        .route("/api/table-layouts/move", put(move_guest))
        .route("/api/table-layouts/swap", put(swap))
}

#[derive(Debug, Serialize)]
pub struct UnassignResponse {
    /// Seat that was released; `null` when the guest had none
    pub removed: Option<SeatAssignment>,
}

/// GET /api/table-layouts?plan=
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<SeatAssignment>> {
    let plan = query.plan()?;
    Ok(Json(seat::list_for_plan(&state.db.pool, user.id, plan).await?))
}

/// POST /api/table-layouts
pub async fn assign(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SeatRequest>,
) -> CreatedResult<SeatAssignment> {
    let seat = state
        .engine
        .assign(user.id, req.id_guest, Destination::from(&req), req.plan)
        .await?;
    created(seat)
}

/// DELETE /api/table-layouts/{id_guest}?plan= (and the legacy variants)
pub async fn unassign(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id_guest): Path<i64>,
    Query(query): Query<PlanQuery>,
) -> ApiResult<UnassignResponse> {
    let plan = query.plan()?;
    let removed = state.engine.unassign(user.id, id_guest, plan).await?;
    Ok(Json(UnassignResponse { removed }))
}

/// PUT /api/table-layouts/{id}
///
/// Moves the guest sitting in seat row `id`; same drop rules as `/move`.
pub async fn update_seat(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<SeatRequest>,
) -> ApiResult<MoveOutcome> {
    let outcome = state
        .engine
        .move_seat(user.id, id, req.id_guest, Destination::from(&req), req.plan)
        .await?;
    Ok(Json(outcome))
}

/// PUT /api/table-layouts/rect/drop/change
pub async fn rect_drop_change(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SeatRequest>,
) -> ApiResult<MoveOutcome> {
    let outcome = state
        .engine
        .rect_drop_change(user.id, req.id_guest, Destination::from(&req), req.plan)
        .await?;
    Ok(Json(outcome))
}

/// PUT /api/table-layouts/move
pub async fn move_guest(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SeatRequest>,
) -> ApiResult<MoveOutcome> {
    let outcome = state
        .engine
        .move_guest(user.id, req.id_guest, Destination::from(&req), req.plan)
        .await?;
    Ok(Json(outcome))
}

/// PUT /api/table-layouts/swap
pub async fn swap(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SwapRequest>,
) -> ApiResult<MoveOutcome> {
    let outcome = state
        .engine
        .swap(user.id, req.id_guest_a, req.id_guest_b, req.plan)
        .await?;
    Ok(Json(outcome))
}
