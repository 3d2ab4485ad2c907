//! Service error types.

use std::fmt;

use crate::config::ConfigFileError;
use crate::content::GenerateError;

/// Errors that can occur during service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Bundle generation failed
    Generate(GenerateError),
    /// Failed to create HTTP client
    HttpClient(String),
    /// Invalid or incomplete configuration
    Config(String),
    /// Configuration file could not be loaded
    ConfigFile(ConfigFileError),
}

impl ServiceError {
    /// Returns true if the operation was abandoned due to cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Generate(e) if e.is_cancelled())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate(e) => write!(f, "Generation error: {}", e),
            Self::HttpClient(e) => write!(f, "HTTP client error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::ConfigFile(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Generate(e) => Some(e),
            Self::ConfigFile(e) => Some(e),
            Self::HttpClient(_) | Self::Config(_) => None,
        }
    }
}

impl From<GenerateError> for ServiceError {
    fn from(e: GenerateError) -> Self {
        Self::Generate(e)
    }
}

impl From<ConfigFileError> for ServiceError {
    fn from(e: ConfigFileError) -> Self {
        Self::ConfigFile(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = ServiceError::Config("google_api_key is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: google_api_key is not set"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_generate_error_has_source() {
        let err = ServiceError::from(GenerateError::Incomplete { field: "slogan" });
        assert!(err.to_string().contains("slogan"));
        assert!(err.source().is_some());
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_cancelled_generation_is_reported() {
        let err = ServiceError::from(GenerateError::Cancelled);
        assert!(err.is_cancelled());
    }
}
