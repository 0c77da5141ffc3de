//! Error system for seatplan
//!
//! - [`ErrorCode`]: numeric codes shared with the frontend
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error with code, message and optional details
//! - [`ErrorBody`]: the JSON an error response carries
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::SideNotAllowed, "Round tables only have a ring")
//!     .with_detail("table_id", 4);
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code.code(), 5002);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorBody};
