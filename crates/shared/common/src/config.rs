//! Shared configuration structures.

use std::env;

/// Default Redis URL (for development)
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default number of idle connections kept by the pool owner
pub const DEFAULT_MAX_IDLE: u32 = 3;

/// Default idle connection timeout in seconds (4 minutes)
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 240;

/// Connection settings for the keyed hash store backing the user repository.
///
/// The pool settings are carried for whoever owns the connection pool; the
/// repository itself only needs a working connection on demand.
#[derive(Clone)]
pub struct StoreConfig {
    /// Dial target, e.g. `redis://127.0.0.1:6379`
    pub url: String,
    /// Maximum idle connections
    pub max_idle: u32,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &"[REDACTED]")
            .field("max_idle", &self.max_idle)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .finish()
    }
}

impl StoreConfig {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: var("USER_STORE_REDIS_URL")
                .or_else(|| var("REDIS_URL"))
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            max_idle: var("USER_STORE_MAX_IDLE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_IDLE),
            idle_timeout_secs: var("USER_STORE_IDLE_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            max_idle: DEFAULT_MAX_IDLE,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
        }
    }
}
