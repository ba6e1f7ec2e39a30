// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - User aggregates (points, badges)
//! - Enrollments and per-lecture progress records
//! - Course/event collaborator reads that feed aggregates
//! - Leaderboard snapshots
//!
//! Point and badge mutations go through Firestore field transforms
//! (increment, array union) so every producer's write is commutative and
//! no caller ever needs a lock on the user's document.

use crate::db::collections;
use crate::error::AppError;
use crate::models::enrollment::enrollment_doc_id;
use crate::models::progress::progress_doc_id;
use crate::models::{Course, Enrollment, Event, LeaderboardEntry, ProgressRecord, UserAggregate};
use serde::{Deserialize, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Partial update for touching a user's last-active timestamp alongside a
/// point transform.
#[derive(Serialize, Deserialize)]
struct LastActivePatch {
    last_active: String,
}

/// Partial update applied to an enrollment when progress rolls up.
#[derive(Serialize, Deserialize)]
struct EnrollmentProgressPatch {
    progress: u8,
    last_accessed: String,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Aggregate Operations ───────────────────────────────

    /// Get a user aggregate by user ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserAggregate>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or fully replace a user aggregate (signup path).
    pub async fn upsert_user(&self, user: &UserAggregate) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Atomically add a signed delta to a user's points and touch last_active.
    ///
    /// Expressed as a field-transform increment, never a read-then-write of
    /// the counter, so concurrent adds from uncoordinated producers commute.
    pub async fn add_points(&self, user_id: &str, delta: i64, now: &str) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["last_active"])
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(&LastActivePatch {
                last_active: now.to_string(),
            })
            .transforms(|t| t.fields([t.field("points").increment(delta)]))
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Add badge IDs to a user's badge set via array union.
    ///
    /// Idempotent: concurrent duplicate evaluations converge to one
    /// membership per badge, never two.
    pub async fn union_badges(&self, user_id: &str, badge_ids: &[String]) -> Result<(), AppError> {
        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(user_id)
            .transforms(|t| {
                t.fields([t
                    .field("badges")
                    .append_missing_elements(badge_ids.to_vec())])
            })
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(e.to_string()))?;
        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all user IDs (used when rebuilding the leaderboard collection).
    pub async fn list_user_ids(&self) -> Result<Vec<String>, AppError> {
        let users: Vec<UserAggregate> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().map(|u| u.user_id).collect())
    }

    // ─── Enrollment Operations ───────────────────────────────────

    /// Get an enrollment by (user, course).
    pub async fn get_enrollment(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<Option<Enrollment>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ENROLLMENTS)
            .obj()
            .one(enrollment_doc_id(user_id, course_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace an enrollment (enrollment flow / test fixtures).
    pub async fn upsert_enrollment(&self, enrollment: &Enrollment) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ENROLLMENTS)
            .document_id(enrollment_doc_id(&enrollment.user_id, &enrollment.course_id))
            .object(enrollment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Patch only the progress percentage and last-accessed timestamp of an
    /// enrollment, leaving enrollment metadata untouched.
    pub async fn set_enrollment_progress(
        &self,
        user_id: &str,
        course_id: &str,
        progress: u8,
        now: &str,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["progress", "last_accessed"])
            .in_col(collections::ENROLLMENTS)
            .document_id(enrollment_doc_id(user_id, course_id))
            .object(&EnrollmentProgressPatch {
                progress,
                last_accessed: now.to_string(),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count a user's enrollments at 100% completion.
    ///
    /// A user with no enrollments yields 0, never an error.
    pub async fn completed_enrollment_count(&self, user_id: &str) -> Result<u32, AppError> {
        let user_id = user_id.to_string();
        let enrollments: Vec<Enrollment> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ENROLLMENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.as_str()),
                    q.field("progress").eq(100),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(enrollments.len() as u32)
    }

    // ─── Course Operations ───────────────────────────────────────

    /// Get a course document (collaborator-owned; read for its
    /// published-lecture count at aggregation time).
    pub async fn get_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COURSES)
            .obj()
            .one(course_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a course document (collaborator surface / fixtures).
    pub async fn upsert_course(&self, course: &Course) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COURSES)
            .document_id(&course.course_id)
            .object(course)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Progress Record Operations ──────────────────────────────

    /// Get the progress record for one lecture, if any.
    pub async fn get_progress_record(
        &self,
        user_id: &str,
        course_id: &str,
        lecture_id: &str,
    ) -> Result<Option<ProgressRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROGRESS)
            .obj()
            .one(progress_doc_id(user_id, course_id, lecture_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert a progress record at its deterministic key.
    ///
    /// Idempotent by construction: re-reporting the same lecture overwrites
    /// the single record, it never duplicates.
    pub async fn upsert_progress_record(&self, record: &ProgressRecord) -> Result<(), AppError> {
        let doc_id = progress_doc_id(&record.user_id, &record.course_id, &record.lecture_id);
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROGRESS)
            .document_id(doc_id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count a user's completed lectures within one course.
    pub async fn completed_lecture_count_for_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<u32, AppError> {
        let user_id = user_id.to_string();
        let course_id = course_id.to_string();
        let records: Vec<ProgressRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROGRESS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.as_str()),
                    q.field("course_id").eq(course_id.as_str()),
                    q.field("completed").eq(true),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(records.len() as u32)
    }

    /// Count a user's completed lectures across all courses.
    pub async fn completed_lecture_count(&self, user_id: &str) -> Result<u32, AppError> {
        let user_id = user_id.to_string();
        let records: Vec<ProgressRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROGRESS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.as_str()),
                    q.field("completed").eq(true),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(records.len() as u32)
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Get an event document.
    pub async fn get_event(&self, event_id: &str) -> Result<Option<Event>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EVENTS)
            .obj()
            .one(event_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace an event document (collaborator surface / fixtures).
    pub async fn upsert_event(&self, event: &Event) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EVENTS)
            .document_id(&event.event_id)
            .object(event)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Check whether a user is in an event's attendee set.
    pub async fn is_event_attendee(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let event = self.get_event(event_id).await?;
        Ok(event.is_some_and(|e| e.attendees.iter().any(|a| a == user_id)))
    }

    /// Add a user to an event's attendee set via array union (idempotent).
    pub async fn add_event_attendee(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;
        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        client
            .fluent()
            .update()
            .in_col(collections::EVENTS)
            .document_id(event_id)
            .transforms(|t| {
                t.fields([t
                    .field("attendees")
                    .append_missing_elements([user_id.to_string()])])
            })
            .only_transform()
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(e.to_string()))?;
        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count events where the user appears in the attendee set.
    pub async fn attended_event_count(&self, user_id: &str) -> Result<u32, AppError> {
        let user_id = user_id.to_string();
        let events: Vec<Event> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EVENTS)
            .filter(move |q| q.for_all([q.field("attendees").array_contains(user_id.as_str())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(events.len() as u32)
    }

    // ─── Leaderboard Snapshot Operations ─────────────────────────

    /// Fully overwrite the leaderboard snapshot for one user.
    ///
    /// Last-writer-wins is acceptable: every writer computes from the same
    /// source-of-truth collections, so concurrent refreshes converge.
    pub async fn set_leaderboard_entry(&self, entry: &LeaderboardEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LEADERBOARD)
            .document_id(&entry.user_id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read the top-N leaderboard snapshots ordered by points descending.
    ///
    /// Ties order by user id ascending (requires the matching composite
    /// Firestore index), which keeps read-time rank assignment stable.
    pub async fn top_leaderboard_entries(
        &self,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .order_by([
                ("points", firestore::FirestoreQueryDirection::Descending),
                ("user_id", firestore::FirestoreQueryDirection::Ascending),
            ])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
