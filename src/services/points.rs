// SPDX-License-Identifier: MIT

//! Point awarding with badge/leaderboard cascade.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::services::{BadgeEvaluator, LeaderboardService};
use crate::time_utils::now_rfc3339;

/// Applies point deltas and triggers the dependent aggregate updates.
///
/// This surface performs no deduplication of *why* points were granted:
/// calling it twice for the same underlying event grants points twice.
/// Callers gate on state transitions (see ProgressService, EventService)
/// when exactness matters.
#[derive(Clone)]
pub struct PointsService {
    db: FirestoreDb,
    badges: BadgeEvaluator,
    leaderboard: LeaderboardService,
}

impl PointsService {
    pub fn new(db: FirestoreDb, badges: BadgeEvaluator, leaderboard: LeaderboardService) -> Self {
        Self {
            db,
            badges,
            leaderboard,
        }
    }

    /// Atomically add a signed delta to the user's points, then run badge
    /// evaluation and leaderboard refresh for the same user in parallel.
    ///
    /// Returns Ok once the point add itself has been applied. The cascade
    /// is independently fallible: its failures are logged and never roll
    /// back or mask the point addition. Retrying after a failed add can
    /// overcount if the original write actually landed; callers that need
    /// exactness must wrap this in at-most-once delivery.
    pub async fn award_points(&self, user_id: &str, delta: i64, reason: &str) -> Result<()> {
        let now = now_rfc3339();
        self.db.add_points(user_id, delta, &now).await?;
        tracing::info!(user_id, delta, reason, "Points applied");

        let (badge_result, refresh_result) = tokio::join!(
            self.badges.evaluate(user_id),
            self.leaderboard.refresh_entry(user_id),
        );

        match badge_result {
            Ok(newly_awarded) if !newly_awarded.is_empty() => {
                tracing::info!(user_id, badges = ?newly_awarded, "Cascade awarded badges");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Badge evaluation failed after point add");
            }
        }

        if let Err(e) = refresh_result {
            tracing::warn!(user_id, error = %e, "Leaderboard refresh failed after point add");
        }

        Ok(())
    }
}
