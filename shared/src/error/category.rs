//! Error categories by code range

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx: malformed or conflicting input
    Request,
    /// 1xxx
    Account,
    /// 2xxx
    Permission,
    /// 3xxx: guests and categories
    Guest,
    /// 4xxx: tables and map placements
    Table,
    /// 5xxx
    Seating,
    /// 6xxx
    Message,
    /// Anything else; logged when returned
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code / 1000 {
            0 => Self::Request,
            1 => Self::Account,
            2 => Self::Permission,
            3 => Self::Guest,
            4 => Self::Table,
            5 => Self::Seating,
            6 => Self::Message,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
