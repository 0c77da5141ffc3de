//! HTTP API
//!
//! - [`health`]: liveness
//! - [`auth`]: register, login, profile and password
//! - [`categories`], [`guests`], [`tables`], [`map_tables`]: owner-scoped CRUD
//! - [`table_layouts`]: seat mutations through the seating engine
//! - [`seating`]: global index and printable chart
//! - [`messages`]: organizer support thread and admin replies

pub mod auth;
pub mod categories;
pub mod guests;
pub mod health;
pub mod map_tables;
pub mod messages;
pub mod seating;
pub mod table_layouts;
pub mod tables;

use axum::{Json, Router, middleware};
use http::{HeaderValue, StatusCode};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::Plan;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::validation::parse_plan;

pub type ApiResult<T> = Result<Json<T>, ServiceError>;

/// POST handlers answer `201 Created` with the new resource
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), ServiceError>;

pub(crate) fn created<T>(value: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(value)))
}

/// `?plan=A|B`; required on plan-scoped routes
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    pub plan: Option<String>,
}

impl PlanQuery {
    pub fn plan(&self) -> Result<Plan, AppError> {
        parse_plan(self.plan.as_deref())
    }
}

/// Every route, no middleware
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(guests::router())
        .merge(tables::router())
        .merge(map_tables::router())
        .merge(table_layouts::router())
        .merge(seating::router())
        .merge(messages::router())
}

/// Fully configured application: auth, tracing, request ids, CORS
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    build_router()
        // innermost: runs right before the handlers
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    match config.allowed_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods(Any)
            .allow_headers(Any),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "ALLOWED_ORIGIN is not a valid header value, CORS disabled");
            CorsLayer::new()
        }
        None if config.is_development() => CorsLayer::permissive(),
        None => CorsLayer::new(),
    }
}
