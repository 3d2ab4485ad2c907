//! Provider types and capability traits

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::retry::Retryable;

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Network failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body could not be decoded or carried no usable payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Generated content does not follow the expected format.
    #[error("Unparseable content: {0}")]
    UnparseableContent(String),

    /// Request could not be encoded.
    #[error("Request encoding failed: {0}")]
    Encoding(String),
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::MalformedResponse(_) => true,
            Self::UnparseableContent(_) | Self::Encoding(_) => false,
        }
    }
}

/// A text-generation request: an instruction preamble plus structured,
/// JSON-encoded inputs for the model to work from.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrompt {
    /// Instruction placed before the JSON inputs.
    pub preamble: String,
    /// JSON-encoded structured inputs.
    pub inputs: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl TextPrompt {
    /// Creates a prompt from serializable inputs.
    pub fn from_inputs<T: Serialize>(
        preamble: impl Into<String>,
        inputs: &T,
        temperature: f32,
    ) -> Result<Self, ProviderError> {
        let inputs =
            serde_json::to_string(inputs).map_err(|e| ProviderError::Encoding(e.to_string()))?;
        Ok(Self {
            preamble: preamble.into(),
            inputs,
            temperature,
            max_output_tokens: None,
        })
    }

    /// Caps the number of generated tokens.
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Renders the final prompt text sent to the model.
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.preamble, self.inputs)
    }
}

/// Generative-content capability: text and images.
///
/// Implementors wrap a remote generative API. Calls are expected to be slow
/// and to fail transiently; callers wrap them in a
/// [`RetryPolicy`](crate::retry::RetryPolicy).
pub trait ContentProvider: Send + Sync {
    /// Generates text for a structured prompt.
    fn generate_text(
        &self,
        prompt: &TextPrompt,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Renders a prompt into an embeddable image reference (typically a
    /// `data:` URI).
    fn generate_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Returns the provider's name for logging.
    fn name(&self) -> &str;
}

/// Asset-search capability used to refill the selection pool.
pub trait AssetSearch: Send + Sync {
    /// Searches for up to `limit` asset URLs matching `query`.
    fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send;
}
