//! User configuration.
//!
//! Settings are read from `~/.pitchparty/config.ini` (or an explicit path),
//! then overlaid with environment variables:
//!
//! ```ignore
//! use pitchparty::config::ConfigFile;
//!
//! let mut config = ConfigFile::load()?;
//! config.apply_env_overrides();
//! ```

mod defaults;
mod env;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{parse_bool, DEFAULT_EMPTY_WAIT_MS, DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_FILE};
pub use env::{ENV_CACHE_SIZE, ENV_ENABLE_PRELOAD, ENV_GIPHY_API_KEY, ENV_GOOGLE_API_KEY};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AssetSettings, CacheSettings, ConfigFile, LoggingSettings, PreloaderSettings,
    ProviderSettings, RetrySettings,
};
