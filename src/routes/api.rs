// SPDX-License-Identifier: MIT

//! API routes: thin wrappers over the aggregation engine.
//!
//! Callers pass already-validated identifiers; a missing identifier yields
//! empty aggregates downstream, not an error here.

use crate::error::{AppError, Result};
use crate::models::badge::BADGE_CATALOG;
use crate::models::leaderboard::RankedEntry;
use crate::services::ProgressSnapshot;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/{user_id}/points", post(award_points))
        .route(
            "/api/users/{user_id}/badges/evaluate",
            post(evaluate_badges),
        )
        .route("/api/users/{user_id}/achievements", get(get_achievements))
        .route(
            "/api/users/{user_id}/leaderboard/refresh",
            post(refresh_leaderboard_entry),
        )
        .route("/api/progress", post(record_progress))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/leaderboard/rebuild", post(rebuild_leaderboard))
        .route("/api/events/{event_id}/attendees", post(register_attendance))
}

// ─── Points ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct AwardPointsRequest {
    delta: i64,
    reason: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Apply a signed point delta and trigger the badge/leaderboard cascade.
async fn award_points(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<AwardPointsRequest>,
) -> Result<Json<SuccessResponse>> {
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must be non-zero".to_string()));
    }
    if payload.reason.trim().is_empty() {
        return Err(AppError::BadRequest("reason must not be empty".to_string()));
    }

    state
        .points
        .award_points(&user_id, payload.delta, &payload.reason)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

// ─── Badges ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EvaluateBadgesResponse {
    pub newly_awarded: Vec<String>,
}

/// Evaluate badge rules for a user and award any newly-qualifying badges.
async fn evaluate_badges(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<EvaluateBadgesResponse>> {
    let newly_awarded = state.badges.evaluate(&user_id).await?;
    Ok(Json(EvaluateBadgesResponse { newly_awarded }))
}

#[derive(Serialize)]
pub struct AwardedBadge {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct AchievementsResponse {
    pub user_id: String,
    pub points: i64,
    pub badges: Vec<AwardedBadge>,
}

/// Read a user's current points and held badges (joined to the catalog).
async fn get_achievements(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<AchievementsResponse>> {
    // Missing aggregate reads as empty, per the external-interface contract.
    let user = state.db.get_user(&user_id).await?;
    let (points, held) = match &user {
        Some(u) => (u.points, u.badges.clone()),
        None => (0, Vec::new()),
    };

    let badges = held
        .iter()
        .map(|id| {
            let catalog = BADGE_CATALOG.iter().find(|b| b.id == id);
            AwardedBadge {
                id: id.clone(),
                name: catalog.map(|b| b.name.to_string()).unwrap_or_default(),
                description: catalog
                    .map(|b| b.description.to_string())
                    .unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(AchievementsResponse {
        user_id,
        points,
        badges,
    }))
}

// ─── Progress ────────────────────────────────────────────────

#[derive(Deserialize)]
struct RecordProgressRequest {
    user_id: String,
    course_id: String,
    lecture_id: String,
    watch_time_seconds: u32,
    #[serde(default)]
    completed: bool,
}

/// Record lecture progress and roll it up into the course percentage.
async fn record_progress(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordProgressRequest>,
) -> Result<Json<ProgressSnapshot>> {
    if payload.user_id.is_empty() || payload.course_id.is_empty() || payload.lecture_id.is_empty() {
        return Err(AppError::BadRequest(
            "user_id, course_id and lecture_id are required".to_string(),
        ));
    }

    let snapshot = state
        .progress
        .record_lecture_progress(
            &payload.user_id,
            &payload.course_id,
            &payload.lecture_id,
            payload.watch_time_seconds,
            payload.completed,
        )
        .await?;

    Ok(Json(snapshot))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u32>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<RankedEntry>,
}

/// Get the top-N leaderboard with read-time dense ranks.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let limit = params
        .limit
        .unwrap_or(state.config.leaderboard_default_limit);
    if limit == 0 {
        return Err(AppError::BadRequest("limit must be at least 1".to_string()));
    }
    let limit = limit.min(state.config.leaderboard_max_limit);

    let entries = state.leaderboard.get_leaderboard(limit).await?;
    Ok(Json(LeaderboardResponse { entries }))
}

/// Refresh one user's leaderboard snapshot.
async fn refresh_leaderboard_entry(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    state.leaderboard.refresh_entry(&user_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Serialize)]
pub struct RebuildResponse {
    pub users_refreshed: usize,
}

/// Rebuild every user's leaderboard snapshot.
async fn rebuild_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RebuildResponse>> {
    let users_refreshed = state.leaderboard.rebuild_all().await?;
    Ok(Json(RebuildResponse { users_refreshed }))
}

// ─── Events ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct RegisterAttendanceRequest {
    user_id: String,
}

#[derive(Serialize)]
pub struct RegisterAttendanceResponse {
    pub newly_registered: bool,
}

/// Register a user as an event attendee (idempotent) and award the
/// attendance reward on first registration.
async fn register_attendance(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(payload): Json<RegisterAttendanceRequest>,
) -> Result<Json<RegisterAttendanceResponse>> {
    if payload.user_id.is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }

    let newly_registered = state
        .events
        .register_attendance(&payload.user_id, &event_id)
        .await?;

    Ok(Json(RegisterAttendanceResponse { newly_registered }))
}
