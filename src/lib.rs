// SPDX-License-Identifier: MIT

//! LearnLoop Achievements: derived achievement and progress state for learners.
//!
//! This crate maintains point totals, badge unlocks, leaderboard snapshots,
//! and per-course completion percentages as eventually-consistent aggregates
//! over primary learning events (lectures watched, events attended).

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{BadgeEvaluator, EventService, LeaderboardService, PointsService, ProgressService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub points: PointsService,
    pub badges: BadgeEvaluator,
    pub progress: ProgressService,
    pub leaderboard: LeaderboardService,
    pub events: EventService,
}
