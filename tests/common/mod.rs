// SPDX-License-Identifier: MIT

use learnloop_achievements::config::Config;
use learnloop_achievements::db::FirestoreDb;
use learnloop_achievements::models::{Course, Enrollment, Event, UserAggregate};
use learnloop_achievements::routes::create_router;
use learnloop_achievements::services::{
    BadgeEvaluator, EventService, LeaderboardService, PointsService, ProgressService,
};
use learnloop_achievements::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// The wired aggregation engine over a database connection.
#[allow(dead_code)]
pub struct Engine {
    pub points: PointsService,
    pub badges: BadgeEvaluator,
    pub progress: ProgressService,
    pub leaderboard: LeaderboardService,
    pub events: EventService,
}

/// Wire the engine the way main.rs does, with default reward amounts.
#[allow(dead_code)]
pub fn engine(db: FirestoreDb) -> Engine {
    let config = Config::test_default();
    let badges = BadgeEvaluator::new(db.clone());
    let leaderboard = LeaderboardService::new(db.clone());
    let points = PointsService::new(db.clone(), badges.clone(), leaderboard.clone());
    let progress = ProgressService::new(db.clone(), points.clone(), config.lecture_reward_points);
    let events = EventService::new(db, points.clone(), config.event_reward_points);

    Engine {
        points,
        badges,
        progress,
        leaderboard,
        events,
    }
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    let wired = engine(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        points: wired.points,
        badges: wired.badges,
        progress: wired.progress,
        leaderboard: wired.leaderboard,
        events: wired.events,
    });

    (create_router(state.clone()), state)
}

/// Generate a unique ID for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Helper to create a basic user aggregate.
#[allow(dead_code)]
pub fn test_user(user_id: &str) -> UserAggregate {
    UserAggregate {
        user_id: user_id.to_string(),
        display_name: format!("Test {}", user_id),
        points: 0,
        badges: vec![],
        created_at: "2024-01-15T10:00:00Z".to_string(),
        last_active: "2024-01-15T10:00:00Z".to_string(),
    }
}

/// Helper to create an enrollment at a given progress percentage.
#[allow(dead_code)]
pub fn test_enrollment(user_id: &str, course_id: &str, progress: u8) -> Enrollment {
    Enrollment {
        user_id: user_id.to_string(),
        course_id: course_id.to_string(),
        progress,
        is_active: true,
        last_accessed: "2024-01-15T10:00:00Z".to_string(),
        enrolled_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// Helper to create a course with a published-lecture count.
#[allow(dead_code)]
pub fn test_course(course_id: &str, published_lecture_count: u32) -> Course {
    Course {
        course_id: course_id.to_string(),
        title: format!("Course {}", course_id),
        published_lecture_count,
    }
}

/// Helper to create an event with a starting attendee list.
#[allow(dead_code)]
pub fn test_event(event_id: &str, attendees: &[&str]) -> Event {
    Event {
        event_id: event_id.to_string(),
        title: format!("Event {}", event_id),
        attendees: attendees.iter().map(|s| s.to_string()).collect(),
        starts_at: "2024-02-01T18:00:00Z".to_string(),
    }
}
