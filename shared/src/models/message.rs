//! Support messages between an organizer and the admins

use serde::{Deserialize, Serialize};

/// One message in an organizer's thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Message {
    pub id: i64,
    /// Organizer owning the thread
    pub user_id: i64,
    /// Sending admin; `None` when the organizer wrote it
    pub admin_id: Option<i64>,
    pub body: String,
    pub sent_at: i64,
    pub is_read: bool,
}

impl Message {
    pub fn from_admin(&self) -> bool {
        self.admin_id.is_some()
    }
}

/// POST /api/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    pub body: String,
}

/// POST /api/admin/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminMessageCreate {
    pub user_id: i64,
    pub body: String,
}

/// PUT /api/messages/read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}
