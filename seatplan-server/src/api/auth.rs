//! Account endpoints
//!
//! `/api/auth/*` is public; `/api/me` needs a token.

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    LoginRequest, LoginResponse, PasswordChange, ProfileUpdate, RegisterRequest, UserInfo,
};

use super::{ApiResult, CreatedResult, created};
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::db::user::{self, NewUser};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, validate_email, validate_event_date, validate_optional_text, validate_password,
    validate_required_text,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/me", get(me).put(update_me))
        .route("/api/me/password", put(change_password))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken(e: sqlx::Error) -> ServiceError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::already_exists("Account").into()
        }
        other => ServiceError::from(other),
    }
}

fn account_gone() -> AppError {
    AppError::with_message(ErrorCode::NotAuthenticated, "Account no longer exists")
}

fn hash(password: &str) -> Result<String, ServiceError> {
    hash_password(password).map_err(|e| ServiceError::db(format!("password hashing failed: {e}")))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> CreatedResult<UserInfo> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_optional_text(&req.event_name, "event_name", MAX_NAME_LEN)?;
    if let Some(date) = &req.event_date {
        validate_event_date(date)?;
    }

    let email = normalize_email(&req.email);
    if user::find_by_email(&state.db.pool, &email).await?.is_some() {
        return Err(AppError::already_exists("Account").into());
    }

    let password_hash = hash(&req.password)?;
    let event_name = req.event_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let event_date = req.event_date.as_deref().filter(|s| !s.is_empty());
    let new = NewUser {
        is_admin: state.config.is_admin_email(&email),
        event_name,
        event_date,
        ..NewUser::organizer(req.name.trim(), &email, &password_hash)
    };
    let created_user = user::create(&state.db.pool, &new, shared::util::now_millis())
        .await
        .map_err(email_taken)?;

    tracing::info!(user_id = created_user.id, is_admin = created_user.is_admin, "Account registered");
    created(created_user.into())
}

/// POST /api/auth/login
///
/// Unknown email and wrong password give the same answer.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if req.email.trim().is_empty() {
        return Err(AppError::required("email").into());
    }
    if req.password.is_empty() {
        return Err(AppError::required("password").into());
    }

    let found = user::find_by_email(&state.db.pool, &normalize_email(&req.email)).await?;
    let account = match found {
        Some(account) if verify_password(&req.password, &account.password_hash) => account,
        _ => {
            tracing::warn!("Login failed");
            return Err(AppError::invalid_credentials().into());
        }
    };

    let token = state
        .jwt
        .generate_token(account.id, &account.email)
        .map_err(|e| ServiceError::db(e.to_string()))?;

    tracing::info!(user_id = account.id, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

/// GET /api/me
pub async fn me(State(state): State<AppState>, current: CurrentUser) -> ApiResult<UserInfo> {
    let account = user::find_by_id(&state.db.pool, current.id)
        .await?
        .ok_or_else(account_gone)?;
    Ok(Json(account.into()))
}

/// PUT /api/me
///
/// The token keeps the email it was issued with; clients log in again
/// after changing it.
pub async fn update_me(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ProfileUpdate>,
) -> ApiResult<UserInfo> {
    if req.is_empty() {
        return Err(AppError::validation("Nothing to update").into());
    }
    if let Some(name) = &req.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }
    validate_optional_text(&req.event_name, "event_name", MAX_NAME_LEN)?;
    if let Some(date) = &req.event_date {
        validate_event_date(date)?;
    }

    let email = req.email.as_deref().map(normalize_email);
    if let Some(email) = &email
        && let Some(existing) = user::find_by_email(&state.db.pool, email).await?
        && existing.id != current.id
    {
        return Err(AppError::already_exists("Account").into());
    }

    let updated = user::update_profile(
        &state.db.pool,
        current.id,
        req.name.as_deref().map(str::trim),
        email.as_deref(),
        req.event_name.as_deref().map(str::trim),
        req.event_date.as_deref(),
    )
    .await
    .map_err(email_taken)?
    .ok_or_else(account_gone)?;

    tracing::info!(user_id = current.id, "Profile updated");
    Ok(Json(updated.into()))
}

/// PUT /api/me/password
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<PasswordChange>,
) -> ApiResult<UserInfo> {
    if req.current_password.is_empty() {
        return Err(AppError::required("current_password").into());
    }
    validate_password(&req.new_password)?;

    let account = user::find_by_id(&state.db.pool, current.id)
        .await?
        .ok_or_else(account_gone)?;
    if !verify_password(&req.current_password, &account.password_hash) {
        tracing::warn!(user_id = current.id, "Password change refused");
        return Err(AppError::new(ErrorCode::CurrentPasswordMismatch).into());
    }

    let password_hash = hash(&req.new_password)?;
    if !user::set_password_hash(&state.db.pool, current.id, &password_hash).await? {
        return Err(account_gone().into());
    }

    tracing::info!(user_id = current.id, "Password changed");
    Ok(Json(account.into()))
}
