//! Application configuration loaded from environment variables.
//!
//! Everything here is non-sensitive; the service carries no secrets of its
//! own (authentication is handled by the surrounding platform).

use std::env;

/// Points awarded for a first-time lecture completion.
const DEFAULT_LECTURE_REWARD: i64 = 10;
/// Points awarded for a first-time event registration.
const DEFAULT_EVENT_REWARD: i64 = 5;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID
    pub gcp_project_id: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Points granted when a lecture transitions to completed
    pub lecture_reward_points: i64,
    /// Points granted on first-time event registration
    pub event_reward_points: i64,
    /// Default number of leaderboard entries returned
    pub leaderboard_default_limit: u32,
    /// Upper bound on leaderboard entries per request
    pub leaderboard_max_limit: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            lecture_reward_points: parse_i64_var("LECTURE_REWARD_POINTS", DEFAULT_LECTURE_REWARD)?,
            event_reward_points: parse_i64_var("EVENT_REWARD_POINTS", DEFAULT_EVENT_REWARD)?,
            leaderboard_default_limit: 10,
            leaderboard_max_limit: 100,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            lecture_reward_points: DEFAULT_LECTURE_REWARD,
            event_reward_points: DEFAULT_EVENT_REWARD,
            leaderboard_default_limit: 10,
            leaderboard_max_limit: 100,
        }
    }
}

/// Parse an optional integer env var, falling back to a default.
fn parse_i64_var(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
