//! Guest Model

use serde::{Deserialize, Serialize};

use super::plan::{Intolerance, Side};

/// Guest entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    /// Free text accompanying the `other` intolerance
    pub other_text: Option<String>,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Intolerance flags (junction table)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub intolerances: Vec<Intolerance>,
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCreate {
    #[serde(alias = "guest_name")]
    pub name: String,
    #[serde(default, alias = "id_category")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub intolerances: Vec<Intolerance>,
    #[serde(default)]
    pub other_text: Option<String>,
}

/// Update guest payload
///
/// Replaces every field, so an absent `category_id` clears the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestUpdate {
    #[serde(alias = "guest_name")]
    pub name: String,
    #[serde(default, alias = "id_category")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub intolerances: Vec<Intolerance>,
    #[serde(default)]
    pub other_text: Option<String>,
}

/// Where a guest sits in one plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSeat {
    pub table_id: i64,
    pub table_name: String,
    pub side: Side,
    pub position: i32,
}

/// Guest together with their seat in the requested plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestWithSeat {
    #[serde(flatten)]
    pub guest: Guest,
    pub seat: Option<GuestSeat>,
}
