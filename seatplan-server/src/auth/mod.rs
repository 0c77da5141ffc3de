//! Authentication
//!
//! Bearer JWT on every `/api/` route except `/api/auth/*`. The middleware
//! puts a [`CurrentUser`] into the request extensions; handlers take it as
//! an extractor.

mod jwt;
mod password;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
pub use password::{hash_password, verify_password};

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::request::Parts;
use shared::error::AppError;

use crate::db::user;
use crate::error::ServiceError;
use crate::state::AppState;

/// Paths reachable without a token
fn is_public(path: &str) -> bool {
    !path.starts_with("/api/") || path.starts_with("/api/auth/")
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = match header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Missing authorization header");
            return Err(AppError::not_authenticated());
        }
    };

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, uri = %req.uri(), "Token rejected");
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;
    let user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed token claims: {e}")))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Admin rights are read from the stored account, not the token
pub async fn require_admin(state: &AppState, current: &CurrentUser) -> Result<(), ServiceError> {
    match user::find_by_id(&state.db.pool, current.id).await? {
        Some(account) if account.is_admin => Ok(()),
        _ => {
            tracing::warn!(user_id = current.id, "Admin route refused");
            Err(AppError::permission_denied("Admin rights required").into())
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
