//! Remote content providers
//!
//! This module provides the capability traits the bundle pipeline depends on
//! and their implementations over remote APIs:
//!
//! - [`ContentProvider`]: text and image generation ([`GeminiProvider`])
//! - [`AssetSearch`]: reaction-GIF search ([`GiphyProvider`])
//!
//! Providers talk HTTP through [`AsyncHttpClient`] so they can be exercised
//! against canned responses.
//!
//! ```ignore
//! use pitchparty::provider::{AsyncReqwestClient, GeminiProvider};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let provider = GeminiProvider::new(http_client, api_key);
//! let text = provider.generate_text(&prompt::business_idea_prompt()?).await?;
//! ```

mod gemini;
mod giphy;
mod http;
pub mod prompt;
mod types;

pub use gemini::{GeminiProvider, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL, GEMINI_API_BASE};
pub use giphy::{GiphyProvider, DEFAULT_RATING, GIPHY_SEARCH_URL};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::{AssetSearch, ContentProvider, ProviderError, TextPrompt};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
