//! Map Table Model (canvas placement of a table)

use serde::{Deserialize, Serialize};

use super::plan::Plan;

/// Default canvas coordinate for new placements
pub const DEFAULT_MAP_COORD: f64 = 100.0;

/// Placement of a table on the 2D map of its plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MapTable {
    pub id: i64,
    pub table_id: i64,
    pub plan: Plan,
    pub x: f64,
    pub y: f64,
    /// Degrees, 0 or 90
    pub rotation: i32,
}

/// Create map placement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapTableCreate {
    #[serde(alias = "id_table")]
    pub table_id: i64,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub rotation: Option<i32>,
}

/// Update map placement payload (at least one field)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapTableUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<i32>,
}

impl MapTableUpdate {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.rotation.is_none()
    }
}
