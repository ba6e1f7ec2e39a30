// SPDX-License-Identifier: MIT

//! Leaderboard snapshot model and rank assignment.

use serde::{Deserialize, Serialize};

/// Denormalized leaderboard snapshot for one user.
///
/// Fully overwritten on every refresh; never a source of truth. The whole
/// collection can be dropped and rebuilt from enrollments, events, and
/// progress records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// User ID (also used as document ID)
    pub user_id: String,
    /// Display name at refresh time
    pub user_name: String,
    /// Point total at refresh time
    pub points: i64,
    /// Enrollments at 100% completion
    pub courses_completed: u32,
    /// Events the user is registered for
    pub events_attended: u32,
    /// Completed lecture progress records
    pub lectures_watched: u32,
    /// When this snapshot was computed (ISO 8601)
    pub refreshed_at: String,
}

/// A leaderboard entry with its read-time rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    /// Dense rank, 1-based, strictly by list position
    pub rank: u32,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Assign dense ranks 1..N by list position.
///
/// Ties in points do not share a rank; the store query orders ties by
/// user id ascending, and ranks follow that order positionally.
pub fn assign_ranks(entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry {
            rank: (i + 1) as u32,
            entry,
        })
        .collect()
}
