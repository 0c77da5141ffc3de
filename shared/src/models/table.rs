//! Seating Table Model

use serde::{Deserialize, Serialize};

use super::plan::{Plan, TableShape};

/// A table in one plan
///
/// Ids grow with creation order; global numbering walks tables by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SeatingTable {
    pub id: i64,
    pub name: String,
    pub shape: TableShape,
    pub plan: Plan,
}

/// Create table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    #[serde(alias = "table_name")]
    pub name: String,
    #[serde(alias = "table_type")]
    pub shape: TableShape,
    pub plan: Plan,
}

/// Rename table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUpdate {
    #[serde(alias = "table_name")]
    pub name: String,
}
