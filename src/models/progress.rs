//! Per-lecture progress records.

use serde::{Deserialize, Serialize};

/// A user's progress on a single lecture.
///
/// Keyed deterministically by (user, course, lecture), so re-reporting the
/// same lecture overwrites the one record instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// User ID
    pub user_id: String,
    /// Course ID
    pub course_id: String,
    /// Lecture ID
    pub lecture_id: String,
    /// Seconds watched, as reported by the most recent call
    #[serde(default)]
    pub watch_time_seconds: u32,
    /// Whether the lecture has been completed
    #[serde(default)]
    pub completed: bool,
    /// When the lecture was first completed (ISO 8601)
    pub completed_at: Option<String>,
    /// Last time progress was reported (ISO 8601)
    pub last_watched: String,
}

/// Deterministic progress document ID.
///
/// The key itself enforces at-most-one record per (user, course, lecture).
/// Parts are percent-encoded so ids containing the separator cannot collide.
pub fn progress_doc_id(user_id: &str, course_id: &str, lecture_id: &str) -> String {
    format!(
        "{}_{}_{}",
        urlencoding::encode(user_id),
        urlencoding::encode(course_id),
        urlencoding::encode(lecture_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_deterministic() {
        assert_eq!(
            progress_doc_id("u1", "c1", "L1"),
            progress_doc_id("u1", "c1", "L1")
        );
    }

    #[test]
    fn test_doc_id_distinguishes_parts() {
        assert_ne!(
            progress_doc_id("u1", "c1", "L1"),
            progress_doc_id("u1", "c1", "L2")
        );
        // Underscores inside ids must not collide with the separator
        assert_ne!(
            progress_doc_id("u1_c1", "L1", "x"),
            progress_doc_id("u1", "c1_L1", "x")
        );
    }
}
