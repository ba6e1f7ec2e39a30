//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// User aggregates (points, badges), keyed by user id
    pub const USERS: &str = "users";
    /// Enrollments, keyed by `{user_id}_{course_id}`
    pub const ENROLLMENTS: &str = "enrollments";
    /// Per-lecture progress records, keyed by `{user_id}_{course_id}_{lecture_id}`
    pub const PROGRESS: &str = "progress";
    /// Course catalog (read-only here, owned by the course service)
    pub const COURSES: &str = "courses";
    /// Events with attendee lists (owned by the event service)
    pub const EVENTS: &str = "events";
    /// Denormalized leaderboard snapshots, keyed by user id
    pub const LEADERBOARD: &str = "leaderboard";
}
