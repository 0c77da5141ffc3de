//! Guest API
//!
//! Plan-scoped reads take `?plan=`; deleting a guest goes through the
//! seating engine so its seats are released and compacted first.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{Guest, GuestCreate, GuestUpdate, GuestWithSeat};

use super::{ApiResult, CreatedResult, PlanQuery, created};
use crate::auth::CurrentUser;
use crate::db::guest;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/guests", get(list).post(create))
        .route("/api/guests/all", get(list_with_seats))
        .route("/api/guests/assigned", get(list_assigned))
        .route("/api/guests/unassigned", get(list_unassigned))
        .route("/api/guests/unassigned/count", get(count_unassigned))
        .route("/api/guests/{id}", put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
pub struct AssignedQuery {
    pub plan: Option<String>,
    pub id_table: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

fn validate(name: &str, other_text: &Option<String>) -> Result<(), AppError> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(other_text, "other_text", MAX_NOTE_LEN)
}

/// GET /api/guests
pub async fn list(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Guest>> {
    Ok(Json(guest::list(&state.db.pool, user.id).await?))
}

/// POST /api/guests
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<GuestCreate>,
) -> CreatedResult<Guest> {
    validate(&payload.name, &payload.other_text)?;
    let new_guest = guest::create(&state.db.pool, user.id, &payload).await?;
    tracing::info!(guest_id = new_guest.id, "Guest created");
    created(new_guest)
}

/// PUT /api/guests/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<GuestUpdate>,
) -> ApiResult<Guest> {
    validate(&payload.name, &payload.other_text)?;
    Ok(Json(guest::update(&state.db.pool, user.id, id, &payload).await?))
}

/// DELETE /api/guests/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    state.engine.delete_guest(user.id, id).await?;
    Ok(Json(true))
}

/// GET /api/guests/all?plan=
pub async fn list_with_seats(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<GuestWithSeat>> {
    let plan = query.plan()?;
    Ok(Json(guest::list_with_seats(&state.db.pool, user.id, plan).await?))
}

/// GET /api/guests/assigned?plan=[&id_table=]
pub async fn list_assigned(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<AssignedQuery>,
) -> ApiResult<Vec<GuestWithSeat>> {
    let plan = crate::validation::parse_plan(query.plan.as_deref())?;
    Ok(Json(
        guest::list_assigned(&state.db.pool, user.id, plan, query.id_table).await?,
    ))
}

/// GET /api/guests/unassigned?plan=
pub async fn list_unassigned(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<Guest>> {
    let plan = query.plan()?;
    Ok(Json(guest::list_unassigned(&state.db.pool, user.id, plan).await?))
}

/// GET /api/guests/unassigned/count?plan=
pub async fn count_unassigned(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<CountResponse> {
    let plan = query.plan()?;
    let count = guest::count_unassigned(&state.db.pool, user.id, plan).await?;
    Ok(Json(CountResponse { count }))
}
