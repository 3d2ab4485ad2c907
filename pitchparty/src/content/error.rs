//! Bundle generation errors.

use std::fmt;

use thiserror::Error;

use crate::provider::ProviderError;
use crate::retry::RetryError;

/// Which of the two bundle images a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    First,
    Second,
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "1"),
            Self::Second => write!(f, "2"),
        }
    }
}

/// Errors that abort generation of a bundle.
///
/// No partial bundle is ever produced: any of these means the whole bundle
/// was discarded.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Prompt inputs could not be encoded.
    #[error("failed to build prompt: {0}")]
    Prompt(#[source] ProviderError),

    /// Name and slogan could not be generated.
    #[error("failed to generate business idea: {0}")]
    BusinessIdea(#[source] RetryError<ProviderError>),

    /// The text prompt for an image could not be generated.
    #[error("failed to generate image prompt {slot}: {source}")]
    ImagePrompt {
        slot: ImageSlot,
        source: RetryError<ProviderError>,
    },

    /// An image could not be rendered.
    #[error("failed to generate image {slot}: {source}")]
    Image {
        slot: ImageSlot,
        source: RetryError<ProviderError>,
    },

    /// A bundle field came back empty.
    #[error("bundle field `{field}` is empty")]
    Incomplete { field: &'static str },

    /// Generation was abandoned because cancellation fired.
    #[error("generation cancelled")]
    Cancelled,
}

impl GenerateError {
    /// Returns true if generation was abandoned due to cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Maps a retry failure into a step error, collapsing cancellation.
    pub(crate) fn from_step(
        error: RetryError<ProviderError>,
        step: impl FnOnce(RetryError<ProviderError>) -> Self,
    ) -> Self {
        if error.is_cancelled() {
            Self::Cancelled
        } else {
            step(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_displays_as_ordinal() {
        assert_eq!(ImageSlot::First.to_string(), "1");
        assert_eq!(ImageSlot::Second.to_string(), "2");
    }

    #[test]
    fn cancelled_retry_collapses_to_cancelled() {
        let err = GenerateError::from_step(RetryError::Cancelled, GenerateError::BusinessIdea);
        assert!(err.is_cancelled());
    }

    #[test]
    fn step_error_names_the_step() {
        let err = GenerateError::from_step(
            RetryError::Exhausted {
                attempts: 6,
                source: ProviderError::Http("HTTP 503".to_string()),
            },
            |source| GenerateError::Image {
                slot: ImageSlot::Second,
                source,
            },
        );

        let message = err.to_string();
        assert!(message.contains("image 2"), "{}", message);
        assert!(message.contains("6 attempts"), "{}", message);
    }
}
