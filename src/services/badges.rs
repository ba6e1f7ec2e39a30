// SPDX-License-Identifier: MIT

//! Badge evaluation against current user aggregates.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::badge::newly_qualified;

/// Evaluates the badge rule table for a user and applies awards.
#[derive(Clone)]
pub struct BadgeEvaluator {
    db: FirestoreDb,
}

impl BadgeEvaluator {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Evaluate all badge rules for a user and award any newly-qualifying
    /// badges. Returns the IDs awarded by this call.
    ///
    /// The two source reads run in parallel; if either fails the evaluation
    /// aborts with no partial write. The award itself is a single array
    /// union, so concurrent duplicate evaluations converge to the same
    /// badge set. A crash between read and write can miss a badge until the
    /// next triggering event, never duplicate one.
    pub async fn evaluate(&self, user_id: &str) -> Result<Vec<String>> {
        let (user, completed_courses) = tokio::try_join!(
            self.db.get_user(user_id),
            self.db.completed_enrollment_count(user_id),
        )
        .map_err(|e| AppError::Evaluation(format!("badge evaluation reads failed: {}", e)))?;

        // A missing aggregate is an empty one, not an error.
        let (points, held) = match &user {
            Some(u) => (u.points, u.badges.clone()),
            None => (0, Vec::new()),
        };

        let candidates = newly_qualified(points, completed_courses, &held);
        if candidates.is_empty() {
            tracing::debug!(user_id, points, completed_courses, "No new badges");
            return Ok(Vec::new());
        }

        let badge_ids: Vec<String> = candidates.iter().map(|id| id.to_string()).collect();
        self.db.union_badges(user_id, &badge_ids).await?;

        tracing::info!(user_id, badges = ?badge_ids, "Badges awarded");
        Ok(badge_ids)
    }
}
