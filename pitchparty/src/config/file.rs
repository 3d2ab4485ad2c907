//! Reading and writing `config.ini`.
//!
//! A missing file is not an error: callers get [`ConfigFile::default`] and
//! can materialise it on disk with [`ConfigFile::ensure_exists_at`].

use ini::Ini;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use super::defaults::*;
pub use super::settings::*;

/// Errors raised while loading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file exists but is not valid INI
    #[error("Cannot read config file: {0}")]
    Read(#[from] ini::Error),

    /// The file or its directory could not be written
    #[error("Cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// A key holds a value outside its accepted range
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Reads `~/.pitchparty/config.ini`, or defaults when it is absent.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Reads `path`, or defaults when it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        super::parser::parse_ini(&Ini::load_from_file(path)?)
    }

    /// Writes this configuration to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_error = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(write_error)?;
        }
        std::fs::write(path, super::writer::to_config_string(self)).map_err(write_error)
    }

    /// Writes a commented default file to `path` unless one is already there.
    ///
    /// Returns whether a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().write_to(path).map(|()| true)
    }
}

/// `~/.pitchparty`, falling back to the working directory without a home.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pitchparty")
}

/// `~/.pitchparty/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
