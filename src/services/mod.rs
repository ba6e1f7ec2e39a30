// SPDX-License-Identifier: MIT

//! Services module - the aggregation engine.

pub mod badges;
pub mod events;
pub mod leaderboard;
pub mod points;
pub mod progress;

pub use badges::BadgeEvaluator;
pub use events::EventService;
pub use leaderboard::LeaderboardService;
pub use points::PointsService;
pub use progress::{ProgressService, ProgressSnapshot};
