// SPDX-License-Identifier: MIT

//! LearnLoop Achievements API Server
//!
//! Maintains derived achievement and progress aggregates (points, badges,
//! leaderboard snapshots, course completion) for the LearnLoop platform.

use learnloop_achievements::{
    config::Config,
    db::FirestoreDb,
    services::{BadgeEvaluator, EventService, LeaderboardService, PointsService, ProgressService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting LearnLoop Achievements API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Wire the aggregation engine. PointsService carries the cascade
    // targets so every successful add triggers badge evaluation and a
    // leaderboard refresh.
    let badges = BadgeEvaluator::new(db.clone());
    let leaderboard = LeaderboardService::new(db.clone());
    let points = PointsService::new(db.clone(), badges.clone(), leaderboard.clone());
    let progress = ProgressService::new(db.clone(), points.clone(), config.lecture_reward_points);
    let events = EventService::new(db.clone(), points.clone(), config.event_reward_points);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        points,
        badges,
        progress,
        leaderboard,
        events,
    });

    // Build router
    let app = learnloop_achievements::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learnloop_achievements=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
