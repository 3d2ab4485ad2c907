//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::{
    parse_bool, MAX_BASE_DELAY_MS, MAX_CACHE_SIZE, MAX_EMPTY_WAIT_MS, MAX_FAILURE_COOLDOWN_SECS,
    MAX_MAINTENANCE_INTERVAL_SECS, MAX_RETRIES, MAX_TIMEOUT_SECS, MAX_TTL_SECS,
};
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [provider] section
    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = optional_string(section, "google_api_key") {
            config.provider.google_api_key = Some(v);
        }
        if let Some(v) = optional_string(section, "text_model") {
            config.provider.text_model = v;
        }
        if let Some(v) = optional_string(section, "image_model") {
            config.provider.image_model = v;
        }
        if let Some(v) = section.get("timeout") {
            config.provider.timeout =
                parse_in_range("provider", "timeout", v, 1..=MAX_TIMEOUT_SECS, " (seconds)")?;
        }
    }

    // [assets] section
    if let Some(section) = ini.section(Some("assets")) {
        if let Some(v) = optional_string(section, "giphy_api_key") {
            config.assets.giphy_api_key = Some(v);
        }
        if let Some(v) = optional_string(section, "query") {
            config.assets.query = v;
        }
        if let Some(v) = section.get("limit") {
            config.assets.limit =
                parse_positive("assets", "limit", v, "must be a positive integer")?;
        }
        if let Some(v) = optional_string(section, "rating") {
            let v = v.to_lowercase();
            if !["g", "pg", "pg-13", "r"].contains(&v.as_str()) {
                return Err(invalid("assets", "rating", &v, "must be one of: g, pg, pg-13, r"));
            }
            config.assets.rating = v;
        }
        if let Some(v) = section.get("ttl") {
            config.assets.ttl = parse_in_range("assets", "ttl", v, 1..=MAX_TTL_SECS, " (seconds)")?;
        }
        if let Some(v) = section.get("draw_attempts") {
            config.assets.draw_attempts =
                parse_value("assets", "draw_attempts", v, "must be a non-negative integer")?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("size") {
            config.cache.size = parse_in_range("cache", "size", v, 1..=MAX_CACHE_SIZE, "")?;
        }
        if let Some(v) = section.get("preload") {
            config.cache.preload = parse_bool(v)
                .ok_or_else(|| invalid("cache", "preload", v, "must be true or false"))?;
        }
        if let Some(v) = section.get("empty_wait_ms") {
            config.cache.empty_wait_ms = parse_in_range(
                "cache",
                "empty_wait_ms",
                v,
                0..=MAX_EMPTY_WAIT_MS,
                " (milliseconds)",
            )?;
        }
    }

    // [preloader] section
    if let Some(section) = ini.section(Some("preloader")) {
        if let Some(v) = section.get("target_ratio") {
            let ratio: f64 = parse_value(
                "preloader",
                "target_ratio",
                v,
                "must be a number greater than 0 and at most 1",
            )?;
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(invalid(
                    "preloader",
                    "target_ratio",
                    v,
                    "must be a number greater than 0 and at most 1",
                ));
            }
            config.preloader.target_ratio = ratio;
        }
        if let Some(v) = section.get("maintenance_interval") {
            config.preloader.maintenance_interval = parse_in_range(
                "preloader",
                "maintenance_interval",
                v,
                1..=MAX_MAINTENANCE_INTERVAL_SECS,
                " (seconds)",
            )?;
        }
        if let Some(v) = section.get("failure_cooldown") {
            config.preloader.failure_cooldown = parse_in_range(
                "preloader",
                "failure_cooldown",
                v,
                0..=MAX_FAILURE_COOLDOWN_SECS,
                " (seconds)",
            )?;
        }
    }

    // [retry] section
    if let Some(section) = ini.section(Some("retry")) {
        if let Some(v) = section.get("max_retries") {
            config.retry.max_retries =
                parse_in_range("retry", "max_retries", v, 0..=MAX_RETRIES, "")?;
        }
        if let Some(v) = section.get("base_delay_ms") {
            config.retry.base_delay_ms = parse_in_range(
                "retry",
                "base_delay_ms",
                v,
                0..=MAX_BASE_DELAY_MS,
                " (milliseconds)",
            )?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = optional_string(section, "directory") {
            config.logging.directory = expand_tilde(&v);
        }
        if let Some(v) = optional_string(section, "file") {
            config.logging.file = v;
        }
    }

    Ok(config)
}

/// Returns the trimmed value of `key`, or `None` if absent or empty.
fn optional_string(section: &Properties, key: &str) -> Option<String> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive<T: FromStr + PartialOrd + Default>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    let parsed: T = parse_value(section, key, value, reason)?;
    if parsed <= T::default() {
        return Err(invalid(section, key, value, reason));
    }
    Ok(parsed)
}

/// Parses an integer that must fall inside `range`; `unit` is appended to
/// the error reason.
fn parse_in_range<T: FromStr + PartialOrd + Display>(
    section: &str,
    key: &str,
    value: &str,
    range: RangeInclusive<T>,
    unit: &str,
) -> Result<T, ConfigFileError> {
    let reason = format!(
        "must be an integer from {} to {}{}",
        range.start(),
        range.end(),
        unit
    );
    let parsed: T = parse_value(section, key, value, &reason)?;
    if !range.contains(&parsed) {
        return Err(invalid(section, key, value, &reason));
    }
    Ok(parsed)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expands a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
