// SPDX-License-Identifier: MIT

//! Lecture progress and course completion roll-up tests.

mod common;
use common::{engine, test_course, test_db, test_enrollment, test_user, unique_id};

#[tokio::test]
async fn test_two_of_four_lectures_is_fifty_percent() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("course");

    db.upsert_user(&common::test_user(&user_id)).await.unwrap();
    db.upsert_course(&test_course(&course_id, 4)).await.unwrap();
    db.upsert_enrollment(&test_enrollment(&user_id, &course_id, 0))
        .await
        .unwrap();

    // One prior completed lecture
    let first = eng
        .progress
        .record_lecture_progress(&user_id, &course_id, "L0", 300, true)
        .await
        .unwrap();
    assert_eq!(first.course_percent, 25);
    assert!(first.points_awarded);

    // Second completion: 2 of 4
    let second = eng
        .progress
        .record_lecture_progress(&user_id, &course_id, "L1", 120, true)
        .await
        .unwrap();
    assert_eq!(second.completed_lectures, 2);
    assert_eq!(second.course_percent, 50);

    let enrollment = db
        .get_enrollment(&user_id, &course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.progress, 50);
    // Partial patch must not clobber enrollment metadata
    assert_eq!(enrollment.enrolled_at, "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_repeat_completion_is_idempotent() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("course");

    db.upsert_user(&test_user(&user_id)).await.unwrap();
    db.upsert_course(&test_course(&course_id, 4)).await.unwrap();
    db.upsert_enrollment(&test_enrollment(&user_id, &course_id, 0))
        .await
        .unwrap();

    eng.progress
        .record_lecture_progress(&user_id, &course_id, "L0", 300, true)
        .await
        .unwrap();
    eng.progress
        .record_lecture_progress(&user_id, &course_id, "L1", 120, true)
        .await
        .unwrap();

    let points_before = db.get_user(&user_id).await.unwrap().unwrap().points;

    // Same call again: still 2 of 4, not 3
    let repeat = eng
        .progress
        .record_lecture_progress(&user_id, &course_id, "L1", 120, true)
        .await
        .unwrap();
    assert_eq!(repeat.completed_lectures, 2);
    assert_eq!(repeat.course_percent, 50);
    assert!(!repeat.points_awarded);

    let enrollment = db
        .get_enrollment(&user_id, &course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.progress, 50);
    assert_eq!(
        db.get_user(&user_id).await.unwrap().unwrap().points,
        points_before,
        "Repeated completion must not award points again"
    );
}

#[tokio::test]
async fn repeat_completion_awards_points_once() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("course");

    db.upsert_user(&test_user(&user_id)).await.unwrap();
    db.upsert_course(&test_course(&course_id, 1)).await.unwrap();
    db.upsert_enrollment(&test_enrollment(&user_id, &course_id, 0))
        .await
        .unwrap();

    for _ in 0..3 {
        eng.progress
            .record_lecture_progress(&user_id, &course_id, "L0", 60, true)
            .await
            .unwrap();
    }

    let user = db.get_user(&user_id).await.unwrap().unwrap();
    assert_eq!(user.points, 10, "Exactly one lecture reward");
}

#[tokio::test]
async fn test_reporting_same_lecture_keeps_one_record() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("course");

    db.upsert_user(&test_user(&user_id)).await.unwrap();
    db.upsert_course(&test_course(&course_id, 2)).await.unwrap();
    db.upsert_enrollment(&test_enrollment(&user_id, &course_id, 0))
        .await
        .unwrap();

    eng.progress
        .record_lecture_progress(&user_id, &course_id, "L0", 60, false)
        .await
        .unwrap();
    eng.progress
        .record_lecture_progress(&user_id, &course_id, "L0", 120, false)
        .await
        .unwrap();

    // The deterministic key means the latest call wins, no duplicates
    let record = db
        .get_progress_record(&user_id, &course_id, "L0")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.watch_time_seconds, 120);
    assert!(!record.completed);
    assert_eq!(
        db.completed_lecture_count_for_course(&user_id, &course_id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_completed_at_survives_re_report() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("course");

    db.upsert_user(&test_user(&user_id)).await.unwrap();
    db.upsert_course(&test_course(&course_id, 1)).await.unwrap();
    db.upsert_enrollment(&test_enrollment(&user_id, &course_id, 0))
        .await
        .unwrap();

    eng.progress
        .record_lecture_progress(&user_id, &course_id, "L0", 60, true)
        .await
        .unwrap();
    let original = db
        .get_progress_record(&user_id, &course_id, "L0")
        .await
        .unwrap()
        .unwrap();

    eng.progress
        .record_lecture_progress(&user_id, &course_id, "L0", 90, true)
        .await
        .unwrap();
    let updated = db
        .get_progress_record(&user_id, &course_id, "L0")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.completed_at, original.completed_at);
    assert_eq!(updated.watch_time_seconds, 90);
}

#[tokio::test]
async fn test_course_with_no_published_lectures_is_zero_percent() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("course");

    db.upsert_user(&test_user(&user_id)).await.unwrap();
    db.upsert_course(&test_course(&course_id, 0)).await.unwrap();
    db.upsert_enrollment(&test_enrollment(&user_id, &course_id, 0))
        .await
        .unwrap();

    let snapshot = eng
        .progress
        .record_lecture_progress(&user_id, &course_id, "L0", 60, true)
        .await
        .unwrap();
    assert_eq!(snapshot.course_percent, 0);
}

#[tokio::test]
async fn test_missing_course_document_is_zero_percent() {
    require_emulator!();

    let db = test_db().await;
    let eng = engine(db.clone());
    let user_id = unique_id("user");
    let course_id = unique_id("missing-course");

    db.upsert_user(&test_user(&user_id)).await.unwrap();

    let snapshot = eng
        .progress
        .record_lecture_progress(&user_id, &course_id, "L0", 60, true)
        .await
        .unwrap();
    assert_eq!(snapshot.total_lectures, 0);
    assert_eq!(snapshot.course_percent, 0);
}
