//! Plan, table shape, side and intolerance enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two independent seating layouts sharing the guest list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum Plan {
    A,
    B,
}

impl Plan {
    pub const ALL: [Plan; 2] = [Plan::A, Plan::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::A => "A",
            Plan::B => "B",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum TableShape {
    Round,
    Rectangular,
    SShaped,
}

impl TableShape {
    pub fn is_round(&self) -> bool {
        matches!(self, TableShape::Round)
    }
}

/// Seat side within a table
///
/// Serialized as the numeric `table_order` code: `0` ring, `1` top,
/// `2` left, `3` bottom, `4` right. The numeric order is a wire encoding
/// only; global numbering uses its own side order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[repr(i32)]
pub enum Side {
    Ring = 0,
    Top = 1,
    Left = 2,
    Bottom = 3,
    Right = 4,
}

impl Side {
    /// The four sides of a rectangular or S-shaped table
    pub const RECT_SIDES: [Side; 4] = [Side::Top, Side::Left, Side::Bottom, Side::Right];

    #[inline]
    pub const fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Side::Ring),
            1 => Some(Side::Top),
            2 => Some(Side::Left),
            3 => Some(Side::Bottom),
            4 => Some(Side::Right),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Ring => "ring",
            Side::Top => "top",
            Side::Left => "left",
            Side::Bottom => "bottom",
            Side::Right => "right",
        }
    }

    /// Whether this side exists on a table of the given shape
    pub fn allowed_for(&self, shape: TableShape) -> bool {
        match shape {
            TableShape::Round => matches!(self, Side::Ring),
            TableShape::Rectangular | TableShape::SShaped => !matches!(self, Side::Ring),
        }
    }
}

impl From<Side> for i32 {
    fn from(side: Side) -> Self {
        side.code()
    }
}

impl TryFrom<i32> for Side {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Side::from_code(value).ok_or_else(|| format!("invalid table_order: {value}"))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dietary flag attached to a guest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Intolerance {
    Baby,
    Vegetarian,
    Vegan,
    GlutenFree,
    Pregnant,
    LactoseFree,
    Other,
}
