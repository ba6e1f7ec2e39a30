//! Enrollment model and course completion math.

use serde::{Deserialize, Serialize};

/// A user's enrollment in a course.
///
/// Created once per (user, course) by the enrollment flow; this core only
/// mutates `progress` and `last_accessed` when lecture progress rolls up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// User ID
    pub user_id: String,
    /// Course ID
    pub course_id: String,
    /// Completion percentage, 0-100
    #[serde(default)]
    pub progress: u8,
    /// Whether the enrollment is active
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    /// Last time the user touched the course (ISO 8601)
    pub last_accessed: String,
    /// When the user enrolled (ISO 8601)
    pub enrolled_at: String,
}

fn default_is_active() -> bool {
    true
}

/// Deterministic enrollment document ID.
///
/// IDs are percent-encoded before joining so an underscore inside a user
/// or course id cannot collide with the separator.
pub fn enrollment_doc_id(user_id: &str, course_id: &str) -> String {
    format!(
        "{}_{}",
        urlencoding::encode(user_id),
        urlencoding::encode(course_id)
    )
}

/// Course completion percentage from lecture counts.
///
/// Integer division with a final clamp; a course with no published
/// lectures is 0% complete, never a division fault.
pub fn completion_percent(completed_lectures: u32, published_lectures: u32) -> u8 {
    if published_lectures == 0 {
        return 0;
    }
    let percent = (completed_lectures as u64 * 100) / published_lectures as u64;
    percent.min(100) as u8
}
