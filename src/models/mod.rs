// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod badge;
pub mod course;
pub mod enrollment;
pub mod leaderboard;
pub mod progress;
pub mod user;

pub use badge::{Badge, BadgeCriterion, BadgeRule, BADGE_CATALOG, BADGE_RULES};
pub use course::{Course, Event};
pub use enrollment::Enrollment;
pub use leaderboard::{LeaderboardEntry, RankedEntry};
pub use progress::ProgressRecord;
pub use user::UserAggregate;
