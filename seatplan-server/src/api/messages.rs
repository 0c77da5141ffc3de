//! Support messages
//!
//! Every organizer has one thread with the admins. Organizers read and write
//! their own thread; admins read any thread and reply into it.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{AdminMessageCreate, MarkReadResponse, Message, MessageCreate};

use super::{ApiResult, CreatedResult, created};
use crate::auth::{CurrentUser, require_admin};
use crate::db::{message, user};
use crate::state::AppState;
use crate::validation::{MAX_MESSAGE_LEN, validate_required_text};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/messages", get(list).post(send))
        .route("/api/messages/read", put(mark_read))
        .route("/api/messages/{id}", delete(remove))
        .route("/api/admin/messages", post(admin_send))
        .route("/api/admin/messages/{user_id}", get(admin_thread))
}

/// GET /api/messages
pub async fn list(State(state): State<AppState>, current: CurrentUser) -> ApiResult<Vec<Message>> {
    Ok(Json(message::list_thread(&state.db.pool, current.id).await?))
}

/// POST /api/messages
pub async fn send(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<MessageCreate>,
) -> CreatedResult<Message> {
    validate_required_text(&req.body, "body", MAX_MESSAGE_LEN)?;
    let sent = message::create(
        &state.db.pool,
        current.id,
        None,
        req.body.trim(),
        shared::util::now_millis(),
    )
    .await?;
    tracing::info!(user_id = current.id, message_id = sent.id, "Message sent");
    created(sent)
}

/// PUT /api/messages/read
pub async fn mark_read(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<MarkReadResponse> {
    let updated = message::mark_read(&state.db.pool, current.id).await?;
    Ok(Json(MarkReadResponse { updated }))
}

/// DELETE /api/messages/{id}
///
/// Allowed for the thread's organizer and for the admin who sent it.
pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    if !message::delete(&state.db.pool, current.id, id).await? {
        return Err(AppError::new(ErrorCode::MessageNotFound)
            .with_detail("message_id", id)
            .into());
    }
    Ok(Json(true))
}

/// GET /api/admin/messages/{user_id}
pub async fn admin_thread(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i64>,
) -> ApiResult<Vec<Message>> {
    require_admin(&state, &current).await?;
    Ok(Json(message::list_thread(&state.db.pool, user_id).await?))
}

/// POST /api/admin/messages
pub async fn admin_send(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<AdminMessageCreate>,
) -> CreatedResult<Message> {
    require_admin(&state, &current).await?;
    validate_required_text(&req.body, "body", MAX_MESSAGE_LEN)?;
    if user::find_by_id(&state.db.pool, req.user_id).await?.is_none() {
        return Err(AppError::validation(format!("Unknown organizer {}", req.user_id))
            .with_detail("user_id", req.user_id)
            .into());
    }

    let sent = message::create(
        &state.db.pool,
        req.user_id,
        Some(current.id),
        req.body.trim(),
        shared::util::now_millis(),
    )
    .await?;
    tracing::info!(admin_id = current.id, user_id = req.user_id, message_id = sent.id, "Admin reply sent");
    created(sent)
}
