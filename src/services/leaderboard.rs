// SPDX-License-Identifier: MIT

//! Leaderboard snapshot refresh and ranked reads.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::leaderboard::{assign_ranks, RankedEntry};
use crate::models::LeaderboardEntry;
use crate::time_utils::now_rfc3339;
use futures_util::{stream, StreamExt};

/// Bound on concurrent refreshes during a full rebuild.
const MAX_CONCURRENT_REFRESHES: usize = 50;

/// Maintains denormalized leaderboard snapshots.
#[derive(Clone)]
pub struct LeaderboardService {
    db: FirestoreDb,
}

impl LeaderboardService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Recompute one user's leaderboard snapshot from source-of-truth
    /// collections and fully overwrite the stored entry.
    ///
    /// The three counts are independent and run concurrently, joined before
    /// the write: a partial snapshot (fresh points, stale counts) is worse
    /// than a stale one, so any read failure abandons the refresh with no
    /// write.
    pub async fn refresh_entry(&self, user_id: &str) -> Result<()> {
        let user = match self.db.get_user(user_id).await? {
            Some(u) => u,
            None => {
                tracing::debug!(user_id, "No user aggregate, skipping leaderboard refresh");
                return Ok(());
            }
        };

        let (courses_completed, events_attended, lectures_watched) = tokio::try_join!(
            self.db.completed_enrollment_count(user_id),
            self.db.attended_event_count(user_id),
            self.db.completed_lecture_count(user_id),
        )
        .map_err(|e| AppError::Evaluation(format!("leaderboard refresh reads failed: {}", e)))?;

        let entry = LeaderboardEntry {
            user_id: user.user_id,
            user_name: user.display_name,
            points: user.points,
            courses_completed,
            events_attended,
            lectures_watched,
            refreshed_at: now_rfc3339(),
        };

        self.db.set_leaderboard_entry(&entry).await?;

        tracing::debug!(
            user_id = %entry.user_id,
            points = entry.points,
            courses_completed,
            events_attended,
            lectures_watched,
            "Leaderboard snapshot refreshed"
        );
        Ok(())
    }

    /// Read the top `limit` snapshots and assign dense positional ranks.
    ///
    /// Pure read over whatever snapshots currently exist; results may lag
    /// the true aggregates by however long since the last refresh.
    pub async fn get_leaderboard(&self, limit: u32) -> Result<Vec<RankedEntry>> {
        let entries = self.db.top_leaderboard_entries(limit).await?;
        Ok(assign_ranks(entries))
    }

    /// Rebuild every user's snapshot with bounded concurrency.
    ///
    /// Snapshots are disposable, so a rebuild is always safe. Individual
    /// failures are logged and skipped; returns the number refreshed.
    pub async fn rebuild_all(&self) -> Result<usize> {
        let user_ids = self.db.list_user_ids().await?;
        let total = user_ids.len();

        let refreshed = stream::iter(user_ids)
            .map(|user_id| async move {
                match self.refresh_entry(&user_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(
                            user_id = %user_id,
                            error = %e,
                            "Leaderboard refresh failed during rebuild"
                        );
                        false
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_REFRESHES)
            .filter(|ok| futures_util::future::ready(*ok))
            .count()
            .await;

        tracing::info!(refreshed, total, "Leaderboard rebuild complete");
        Ok(refreshed)
    }
}
