// SPDX-License-Identifier: MIT

//! Lecture progress recording and course completion roll-up.
//!
//! Handles the core workflow:
//! 1. Upsert the progress record at its deterministic key
//! 2. Recompute the course completion percentage
//! 3. Patch the percentage into the enrollment
//! 4. On a first-time completion, award points (which cascades)

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::enrollment::completion_percent;
use crate::models::ProgressRecord;
use crate::services::PointsService;
use crate::time_utils::now_rfc3339;
use serde::Serialize;

/// Records per-lecture progress and rolls it up into enrollments.
#[derive(Clone)]
pub struct ProgressService {
    db: FirestoreDb,
    points: PointsService,
    lecture_reward_points: i64,
}

/// Result of recording lecture progress.
#[derive(Debug, Serialize)]
pub struct ProgressSnapshot {
    pub course_id: String,
    pub lecture_id: String,
    pub completed_lectures: u32,
    pub total_lectures: u32,
    pub course_percent: u8,
    /// Whether this call triggered the completion reward
    pub points_awarded: bool,
}

impl ProgressService {
    pub fn new(db: FirestoreDb, points: PointsService, lecture_reward_points: i64) -> Self {
        Self {
            db,
            points,
            lecture_reward_points,
        }
    }

    /// Record watch progress for one lecture and update the course's
    /// completion percentage.
    ///
    /// The progress upsert is idempotent by construction (deterministic
    /// key), and the point reward only fires on a not-completed to
    /// completed transition, so re-reporting a finished lecture neither
    /// duplicates the record nor double-awards. Two truly concurrent first
    /// completions of the same lecture can still double-award; the guard
    /// covers retries and duplicate delivery, which is what the platform
    /// actually produces.
    pub async fn record_lecture_progress(
        &self,
        user_id: &str,
        course_id: &str,
        lecture_id: &str,
        watch_time_seconds: u32,
        completed: bool,
    ) -> Result<ProgressSnapshot> {
        let now = now_rfc3339();

        let prior = self
            .db
            .get_progress_record(user_id, course_id, lecture_id)
            .await?;
        let was_completed = prior.as_ref().is_some_and(|p| p.completed);
        let first_completion = completed && !was_completed;

        // Keep the original completion timestamp across re-reports.
        let completed_at = if completed {
            prior
                .as_ref()
                .and_then(|p| p.completed_at.clone())
                .or_else(|| Some(now.clone()))
        } else {
            None
        };

        let record = ProgressRecord {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            lecture_id: lecture_id.to_string(),
            watch_time_seconds,
            completed,
            completed_at,
            last_watched: now.clone(),
        };
        self.db.upsert_progress_record(&record).await?;

        // Recompute from current state: completed count from the progress
        // collection, published count from the course document at call time
        // (not cached; a race against lecture publishing is accepted).
        let (completed_lectures, course) = tokio::try_join!(
            self.db.completed_lecture_count_for_course(user_id, course_id),
            self.db.get_course(course_id),
        )?;
        let total_lectures = course.map(|c| c.published_lecture_count).unwrap_or(0);
        let course_percent = completion_percent(completed_lectures, total_lectures);

        self.db
            .set_enrollment_progress(user_id, course_id, course_percent, &now)
            .await?;

        tracing::info!(
            user_id,
            course_id,
            lecture_id,
            completed,
            course_percent,
            "Lecture progress recorded"
        );

        // The progress write already succeeded; a reward cascade failure is
        // logged, not surfaced to the caller.
        if first_completion {
            if let Err(e) = self
                .points
                .award_points(user_id, self.lecture_reward_points, "lecture completed")
                .await
            {
                tracing::warn!(
                    user_id,
                    lecture_id,
                    error = %e,
                    "Lecture completion reward failed"
                );
            }
        }

        Ok(ProgressSnapshot {
            course_id: course_id.to_string(),
            lecture_id: lecture_id.to_string(),
            completed_lectures,
            total_lectures,
            course_percent,
            points_awarded: first_completion,
        })
    }
}
