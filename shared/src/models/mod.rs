//! Data models
//!
//! Shared between the server, its tests and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod guest;
pub mod map_table;
pub mod message;
pub mod plan;
pub mod seat;
pub mod table;
pub mod user;

// Re-exports
pub use category::*;
pub use guest::*;
pub use map_table::*;
pub use message::*;
pub use plan::*;
pub use seat::*;
pub use table::*;
pub use user::*;
