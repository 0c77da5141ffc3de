//! Global index and seating chart

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::models::SeatingChartRow;

use super::{ApiResult, PlanQuery};
use crate::auth::CurrentUser;
use crate::db::guest;
use crate::seating::{PlanSnapshot, build_chart};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/seating/index", get(index))
        .route("/api/seating/chart", get(chart))
}

/// GET /api/seating/index?plan=
///
/// Guest id to global index; unseated guests are absent.
pub async fn index(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<BTreeMap<i64, u32>> {
    let plan = query.plan()?;
    let snapshot = PlanSnapshot::load(&state.db.pool, user.id, plan).await?;
    Ok(Json(snapshot.global_indexes()))
}

/// GET /api/seating/chart?plan=
pub async fn chart(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<PlanQuery>,
) -> ApiResult<Vec<SeatingChartRow>> {
    let plan = query.plan()?;
    let snapshot = PlanSnapshot::load(&state.db.pool, user.id, plan).await?;
    let guests = guest::list(&state.db.pool, user.id).await?;
    Ok(Json(build_chart(&snapshot, &guests)))
}
