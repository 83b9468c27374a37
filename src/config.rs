//! Process configuration, read from the environment once at startup.
//! `.env` is loaded by `main` before this runs, so dev values land here too.

use std::time::Duration;

use tracing::warn;

pub const ENV_REFRESH_INTERVAL_SECS: &str = "REFRESH_INTERVAL_SECS";
pub const ENV_MAX_ITEMS: &str = "MAX_ITEMS";
pub const ENV_FEED_TIMEOUT_SECS: &str = "FEED_TIMEOUT_SECS";
pub const ENV_SOCIAL_DELAY_MS: &str = "SOCIAL_DELAY_MS";
pub const ENV_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
pub const ENV_PORT: &str = "PORT";

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_MAX_ITEMS: usize = 50;
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SOCIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Seconds between scheduled aggregation cycles.
    pub refresh_interval_secs: u64,
    /// Snapshot size cap, applied after dedup + sort.
    pub max_items: usize,
    /// Per-request timeout for feed downloads.
    pub feed_timeout_secs: u64,
    /// Pause between candidate-account requests (external rate limits).
    pub social_delay_ms: u64,
    /// Env var holding the social-path bearer token. Checked at the first
    /// cycle that needs it, not at startup.
    pub bearer_token_env: &'static str,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            max_items: DEFAULT_MAX_ITEMS,
            feed_timeout_secs: DEFAULT_FEED_TIMEOUT_SECS,
            social_delay_ms: DEFAULT_SOCIAL_DELAY_MS,
            bearer_token_env: ENV_BEARER_TOKEN,
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            refresh_interval_secs: env_parse(ENV_REFRESH_INTERVAL_SECS, DEFAULT_REFRESH_INTERVAL_SECS),
            max_items: env_parse(ENV_MAX_ITEMS, DEFAULT_MAX_ITEMS),
            feed_timeout_secs: env_parse(ENV_FEED_TIMEOUT_SECS, DEFAULT_FEED_TIMEOUT_SECS),
            social_delay_ms: env_parse(ENV_SOCIAL_DELAY_MS, DEFAULT_SOCIAL_DELAY_MS),
            bearer_token_env: ENV_BEARER_TOKEN,
            port: env_parse(ENV_PORT, DEFAULT_PORT),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs.max(1))
    }

    pub fn social_delay(&self) -> Duration {
        Duration::from_millis(self.social_delay_ms)
    }
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparsable env value, using default");
            default
        }),
        Err(_) => default,
    }
}
