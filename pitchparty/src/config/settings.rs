//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Generative provider settings
    pub provider: ProviderSettings,
    /// Reaction-GIF search settings
    pub assets: AssetSettings,
    /// Prefetch cache settings
    pub cache: CacheSettings,
    /// Background preloader settings
    pub preloader: PreloaderSettings,
    /// Retry behaviour for remote calls
    pub retry: RetrySettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Generative provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Google generative-language API key (required to generate bundles)
    pub google_api_key: Option<String>,
    /// Model used for text generation
    pub text_model: String,
    /// Model used for image generation
    pub image_model: String,
    /// HTTP request timeout in seconds
    pub timeout: u64,
}

/// Asset search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSettings {
    /// Giphy API key; without one every bundle gets the placeholder GIF
    pub giphy_api_key: Option<String>,
    /// Search query
    pub query: String,
    /// Results requested per refresh
    pub limit: u32,
    /// Giphy content rating
    pub rating: String,
    /// Pool lifetime in seconds
    pub ttl: u64,
    /// Random draws per pick before accepting a repeat
    pub draw_attempts: u32,
}

/// Prefetch cache configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum number of bundles held
    pub size: usize,
    /// Whether the background preloader starts with the service
    pub preload: bool,
    /// How long a request waits for the initial load before generating itself
    pub empty_wait_ms: u64,
}

/// Background preloader configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PreloaderSettings {
    /// Fraction of the cache size to keep filled
    pub target_ratio: f64,
    /// Seconds between maintenance top-ups
    pub maintenance_interval: u64,
    /// Seconds to wait after a failed initial-fill generation
    pub failure_cooldown: u64,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
