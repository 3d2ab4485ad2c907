//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading, logging initialization and service
//! creation to reduce duplication across command handlers.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pitchparty::config::{config_file_path, ConfigFile};
use pitchparty::logging::{init_logging, LoggingGuard};
use pitchparty::service::{build_service, LiveService};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Effective configuration (file plus environment)
    config: ConfigFile,
    /// Where the configuration was read from
    config_path: PathBuf,
}

impl CliRunner {
    /// Load configuration and initialize logging.
    ///
    /// Environment overrides are applied after logging is up so that
    /// rejected values are reported.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let mut config = ConfigFile::load_from(&config_path)?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        config.apply_env_overrides();

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    /// Get the effective configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("PitchParty v{}", pitchparty::VERSION);
        info!(
            config = %self.config_path.display(),
            log = %self.logging_guard.path().display(),
            "PitchParty CLI: {} command",
            command
        );
    }

    /// Create the live service from the effective configuration.
    pub fn create_service(&self) -> Result<LiveService, CliError> {
        build_service(&self.config)
            .map_err(CliError::ServiceCreation)
            .inspect(|_| info!("Service created successfully"))
    }
}

/// Cancel `token` when Ctrl-C is received.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    info!("Interrupt received, cancelling");
                    token.cancel();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            },
        }
    });
}
