//! Environment variable overrides.
//!
//! Applied after the config file so deployments can inject secrets and
//! sizing without editing `config.ini`:
//!
//! | Variable         | Overrides                 |
//! |------------------|---------------------------|
//! | `GOOGLE_API_KEY` | `provider.google_api_key` |
//! | `GIPHY_API_KEY`  | `assets.giphy_api_key`    |
//! | `CACHE_SIZE`     | `cache.size`              |
//! | `ENABLE_PRELOAD` | `cache.preload`           |
//!
//! Empty variables are ignored. Invalid values are logged and the current
//! value is kept.

use tracing::warn;

use super::defaults::{parse_bool, MAX_CACHE_SIZE};
use super::settings::ConfigFile;

pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_GIPHY_API_KEY: &str = "GIPHY_API_KEY";
pub const ENV_CACHE_SIZE: &str = "CACHE_SIZE";
pub const ENV_ENABLE_PRELOAD: &str = "ENABLE_PRELOAD";

impl ConfigFile {
    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Applies overrides using `lookup` to read variables.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = read(ENV_GOOGLE_API_KEY) {
            self.provider.google_api_key = Some(key);
        }
        if let Some(key) = read(ENV_GIPHY_API_KEY) {
            self.assets.giphy_api_key = Some(key);
        }
        if let Some(value) = read(ENV_CACHE_SIZE) {
            match value.parse::<usize>() {
                Ok(size) if (1..=MAX_CACHE_SIZE).contains(&size) => self.cache.size = size,
                _ => warn!(
                    variable = ENV_CACHE_SIZE,
                    value = %value,
                    current = self.cache.size,
                    "Invalid cache size in environment, keeping current value"
                ),
            }
        }
        if let Some(value) = read(ENV_ENABLE_PRELOAD) {
            match parse_bool(&value) {
                Some(preload) => self.cache.preload = preload,
                None => warn!(
                    variable = ENV_ENABLE_PRELOAD,
                    value = %value,
                    current = self.cache.preload,
                    "Invalid preload flag in environment, keeping current value"
                ),
            }
        }
    }
}
