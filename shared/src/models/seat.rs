//! Seat Assignment Model

use serde::{Deserialize, Serialize};

use super::plan::{Intolerance, Plan, Side, TableShape};

/// One guest seated at one table within one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SeatAssignment {
    pub id: i64,
    pub guest_id: i64,
    pub table_id: i64,
    pub side: Side,
    /// 1-based slot within the (table, side, plan) bucket
    pub position: i32,
    pub plan: Plan,
}

/// Assign / move payload
///
/// Field names follow the `table-layouts` wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRequest {
    pub id_guest: i64,
    pub id_table: i64,
    pub table_order: Side,
    /// Target slot; assigning to a side bucket ignores it and appends
    #[serde(default)]
    pub table_side_position: Option<i32>,
    pub plan: Plan,
}

/// Explicit exchange of two seated guests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id_guest_a: i64,
    pub id_guest_b: i64,
    pub plan: Plan,
}

/// One row of the printable seating chart
///
/// Empty tables appear once with every guest field unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingChartRow {
    pub global_index: Option<u32>,
    pub table_id: i64,
    pub table_name: String,
    pub table_shape: TableShape,
    pub side: Option<Side>,
    pub side_label: Option<String>,
    pub position: Option<i32>,
    pub guest_id: Option<i64>,
    pub guest_name: Option<String>,
    #[serde(default)]
    pub intolerances: Vec<Intolerance>,
    pub other_text: Option<String>,
}

/// Result of a move, drop or swap
///
/// `seat` is always the mover's final seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Seat was empty; the mover left its old seat (if any) and took it
    Relocated { seat: SeatAssignment },
    /// Seat was taken on a side table; the two guests exchanged seats
    Swapped { seat: SeatAssignment, with: i64 },
    /// Seat was taken; the occupant lost it and is now unseated
    Overwrote { seat: SeatAssignment, evicted: i64 },
    /// Mover already sat there
    Unchanged { seat: SeatAssignment },
}

impl MoveOutcome {
    pub fn seat(&self) -> &SeatAssignment {
        match self {
            MoveOutcome::Relocated { seat }
            | MoveOutcome::Swapped { seat, .. }
            | MoveOutcome::Overwrote { seat, .. }
            | MoveOutcome::Unchanged { seat } => seat,
        }
    }
}
