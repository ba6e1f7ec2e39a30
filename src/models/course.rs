//! Collaborator-owned course and event documents.
//!
//! These collections belong to the course/event services; this core reads
//! the few fields that feed aggregates and (for events) array-unions
//! attendees.

use serde::{Deserialize, Serialize};

/// Course document. Only `published_lecture_count` matters here; it is
/// read at aggregation time rather than cached, so a race against lecture
/// publishing is possible and accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course ID (also used as document ID)
    pub course_id: String,
    /// Course title
    pub title: String,
    /// Number of published lectures
    #[serde(default)]
    pub published_lecture_count: u32,
}

/// Event document with its attendee membership set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event ID (also used as document ID)
    pub event_id: String,
    /// Event title
    pub title: String,
    /// User IDs registered as attendees; grows only via array union
    #[serde(default)]
    pub attendees: Vec<String>,
    /// When the event starts (ISO 8601)
    pub starts_at: String,
}
