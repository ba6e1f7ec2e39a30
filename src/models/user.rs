//! User aggregate model for storage and API.

use serde::{Deserialize, Serialize};

/// Per-user achievement aggregate stored in Firestore.
///
/// `points` and `badges` are mutated only through commutative writes
/// (field increment, array union), never by rewriting the whole document,
/// so uncoordinated producers can update the same user concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAggregate {
    /// User ID (also used as document ID)
    pub user_id: String,
    /// Display name (denormalized into leaderboard snapshots)
    pub display_name: String,
    /// Total points; adjusted only via signed atomic adds
    #[serde(default)]
    pub points: i64,
    /// Badge IDs held; grows only via idempotent array union
    #[serde(default)]
    pub badges: Vec<String>,
    /// When the aggregate was created (ISO 8601)
    pub created_at: String,
    /// Last activity timestamp (ISO 8601)
    pub last_active: String,
}

impl UserAggregate {
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b == badge_id)
    }
}
