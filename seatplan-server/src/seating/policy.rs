//! Seating policies
//!
//! Both orderings below change user-visible results (drop behavior and
//! exported numbering), so they are named values rather than inline code.

use shared::models::{Side, TableShape};

/// What a drop onto an occupied seat does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPolicy {
    /// Side tables: a seated mover trades seats with the occupant
    SwapOnOccupiedRect,
    /// Round tables: the occupant is unseated and the mover takes the slot
    OverwriteOnOccupiedRound,
}

impl DropPolicy {
    pub fn for_shape(shape: TableShape) -> Self {
        match shape {
            TableShape::Round => DropPolicy::OverwriteOnOccupiedRound,
            TableShape::Rectangular | TableShape::SShaped => DropPolicy::SwapOnOccupiedRect,
        }
    }
}

/// Side order used when numbering guests of a rectangular or S table.
///
/// Right comes before bottom. This differs from the `table_order` wire
/// codes (top 1, left 2, bottom 3, right 4) and must not be unified with them.
pub const INDEX_SIDE_ORDER: [Side; 4] = [Side::Top, Side::Left, Side::Right, Side::Bottom];

/// Rank of a side within a table for global numbering
pub fn index_rank(side: Side) -> usize {
    match side {
        Side::Ring => 0,
        other => INDEX_SIDE_ORDER
            .iter()
            .position(|s| *s == other)
            .unwrap_or(INDEX_SIDE_ORDER.len()),
    }
}
