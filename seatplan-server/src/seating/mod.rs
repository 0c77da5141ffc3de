//! Seating
//!
//! - [`engine`]: transactional assign, unassign, move and swap
//! - [`index`]: plan-wide guest numbering
//! - [`chart`]: printable rows built on the numbering
//! - [`policy`]: drop and numbering policies

pub mod chart;
pub mod engine;
pub mod index;
pub mod policy;

pub use chart::build_chart;
pub use engine::{Destination, SeatingEngine};
pub use index::{PlanSnapshot, assign_global_indexes};
pub use policy::{DropPolicy, INDEX_SIDE_ORDER};
