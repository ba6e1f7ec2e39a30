// SPDX-License-Identifier: MIT

//! Event attendance registration.
//!
//! Follows the same add-points-then-cascade shape as lecture completion.

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::services::PointsService;

/// Registers event attendance and triggers the attendance reward.
#[derive(Clone)]
pub struct EventService {
    db: FirestoreDb,
    points: PointsService,
    event_reward_points: i64,
}

impl EventService {
    pub fn new(db: FirestoreDb, points: PointsService, event_reward_points: i64) -> Self {
        Self {
            db,
            points,
            event_reward_points,
        }
    }

    /// Add the user to the event's attendee set and, on first registration,
    /// award the attendance reward.
    ///
    /// The membership write is an array union, so repeats are harmless; the
    /// reward is gated on the membership check, so a repeat registration
    /// returns false and awards nothing.
    pub async fn register_attendance(&self, user_id: &str, event_id: &str) -> Result<bool> {
        if self.db.is_event_attendee(event_id, user_id).await? {
            tracing::debug!(user_id, event_id, "Already registered for event");
            return Ok(false);
        }

        self.db.add_event_attendee(event_id, user_id).await?;
        tracing::info!(user_id, event_id, "Event attendance registered");

        // Attendance is recorded; a reward failure is logged, not surfaced.
        if let Err(e) = self
            .points
            .award_points(user_id, self.event_reward_points, "event attended")
            .await
        {
            tracing::warn!(user_id, event_id, error = %e, "Event reward failed");
        }

        Ok(true)
    }
}
