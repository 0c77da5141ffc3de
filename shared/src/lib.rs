//! Shared types for seatplan
//!
//! Domain models, the unified error system and small utilities used by the
//! server and by its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorBody, ErrorCategory, ErrorCode};
pub use models::{Plan, Side, TableShape};
