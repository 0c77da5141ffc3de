//! seatplan server
//!
//! Seating planner for event organizers: guests, categories, tables in two
//! independent plans (A/B), seat assignment and a plan-wide guest numbering.
//!
//! ```text
//! seatplan-server/src/
//! ├── api/         # axum routes and handlers
//! ├── auth/        # JWT + argon2, auth middleware
//! ├── db/          # SQLite pool, migrations, repositories
//! ├── seating/     # seat engine, global index, chart
//! ├── config.rs    # environment configuration
//! ├── error.rs     # ServiceError
//! ├── logger.rs    # tracing setup
//! ├── state.rs     # AppState
//! └── validation.rs
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod seating;
pub mod state;
pub mod validation;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use api::build_app;
pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use db::DbService;
pub use error::{ServiceError, ServiceResult};
pub use seating::SeatingEngine;
pub use state::AppState;
