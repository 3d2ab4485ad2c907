//! Default values for all configuration settings and the
//! `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::settings::*;
use crate::cache::DEFAULT_CAPACITY;
use crate::preloader::{
    DEFAULT_FAILURE_COOLDOWN_SECS, DEFAULT_MAINTENANCE_INTERVAL_SECS, DEFAULT_TARGET_RATIO,
};
use crate::provider::{
    DEFAULT_IMAGE_MODEL, DEFAULT_RATING, DEFAULT_TEXT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use crate::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
use crate::selection::{DEFAULT_DRAW_ATTEMPTS, DEFAULT_QUERY, DEFAULT_SEARCH_LIMIT, DEFAULT_TTL};

/// Default wait for the initial load before generating on demand (2 seconds).
pub const DEFAULT_EMPTY_WAIT_MS: u64 = 2000;

// Upper bounds accepted from config.ini.

/// Largest accepted `cache.size`.
pub const MAX_CACHE_SIZE: usize = 10_000;

/// Largest accepted `cache.empty_wait_ms` (one minute).
pub const MAX_EMPTY_WAIT_MS: u64 = 60_000;

/// Largest accepted `assets.ttl` (one week).
pub const MAX_TTL_SECS: u64 = 7 * 24 * 3600;

/// Largest accepted `preloader.maintenance_interval` (one day).
pub const MAX_MAINTENANCE_INTERVAL_SECS: u64 = 24 * 3600;

/// Largest accepted `preloader.failure_cooldown` (one hour).
pub const MAX_FAILURE_COOLDOWN_SECS: u64 = 3600;

/// Largest accepted `provider.timeout` (one hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Largest accepted `retry.max_retries`.
pub const MAX_RETRIES: u32 = 20;

/// Largest accepted `retry.base_delay_ms` (one minute).
pub const MAX_BASE_DELAY_MS: u64 = 60_000;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "pitchparty.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                google_api_key: None,
                text_model: DEFAULT_TEXT_MODEL.to_string(),
                image_model: DEFAULT_IMAGE_MODEL.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            assets: AssetSettings {
                giphy_api_key: None,
                query: DEFAULT_QUERY.to_string(),
                limit: DEFAULT_SEARCH_LIMIT,
                rating: DEFAULT_RATING.to_string(),
                ttl: DEFAULT_TTL.as_secs(),
                draw_attempts: DEFAULT_DRAW_ATTEMPTS,
            },
            cache: CacheSettings {
                size: DEFAULT_CAPACITY,
                preload: true,
                empty_wait_ms: DEFAULT_EMPTY_WAIT_MS,
            },
            preloader: PreloaderSettings {
                target_ratio: DEFAULT_TARGET_RATIO,
                maintenance_interval: DEFAULT_MAINTENANCE_INTERVAL_SECS,
                failure_cooldown: DEFAULT_FAILURE_COOLDOWN_SECS,
            },
            retry: RetrySettings {
                max_retries: DEFAULT_MAX_RETRIES,
                base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}

/// Parses a boolean the way environment flags are usually written.
///
/// Accepts `1`/`0`, `t`/`f`, `true`/`false` and `yes`/`no` in any case.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" => Some(true),
        "0" | "f" | "false" | "no" => Some(false),
        _ => None,
    }
}
