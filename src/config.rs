//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; the agent never re-reads the
//! environment while serving.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port the caching proxy listens on
    pub port: u16,
    /// Base URL of the upstream fitness API
    pub upstream_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Cache generation tag; bumping it supersedes all existing stores
    pub cache_generation: String,
    /// Path of the offline mutation journal
    pub queue_path: PathBuf,
    /// Maximum delivery attempts per queued mutation.
    /// `None` means unbounded retry; backoff is owned by the sync trigger.
    pub max_sync_attempts: Option<u32>,
    /// Delay before a "remind later" follow-up notification fires
    pub remind_later_delay_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            upstream_url: "http://localhost:5000".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            cache_generation: "v1.0.0".to_string(),
            queue_path: std::env::temp_dir().join("gymsync-queue.json"),
            max_sync_attempts: None,
            remind_later_delay_secs: 3600,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            upstream_url: env::var("UPSTREAM_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("UPSTREAM_URL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            cache_generation: env::var("CACHE_GENERATION")
                .unwrap_or_else(|_| "v1.0.0".to_string()),
            queue_path: env::var("QUEUE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/offline-queue.json")),
            max_sync_attempts: env::var("MAX_SYNC_ATTEMPTS")
                .ok()
                .map(|v| {
                    v.parse()
                        .map_err(|_| ConfigError::Invalid("MAX_SYNC_ATTEMPTS"))
                })
                .transpose()?,
            remind_later_delay_secs: env::var("REMIND_LATER_DELAY_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("REMIND_LATER_DELAY_SECS"))?,
        })
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
