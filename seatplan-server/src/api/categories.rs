//! Category API

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use super::{ApiResult, CreatedResult, created};
use crate::auth::CurrentUser;
use crate::db::category;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_required_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/{id}", put(update).delete(delete))
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<Category>> {
    Ok(Json(category::list(&state.db.pool, user.id).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> CreatedResult<Category> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    created(category::create(&state.db.pool, user.id, &payload).await?)
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> ApiResult<Category> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let updated = category::update(&state.db.pool, user.id, id, &payload)
        .await?
        .ok_or(ErrorCode::CategoryNotFound)?;
    Ok(Json(updated))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !category::delete(&state.db.pool, user.id, id).await? {
        return Err(ErrorCode::CategoryNotFound.into());
    }
    Ok(Json(true))
}
