//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::ProviderError;

/// Default HTTP request timeout in seconds.
///
/// Image generation routinely takes tens of seconds, so this is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = concat!("pitchparty/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous HTTP client operations.
///
/// Providers depend on this trait rather than on reqwest directly so tests
/// can substitute canned responses.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// Returns the response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs an async HTTP POST request with a JSON body.
    ///
    /// Returns the response body as bytes or an error.
    fn post_json(
        &self,
        url: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read_body(
        response: reqwest::Response,
        url: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            warn!(url = redact(url), status = status.as_u16(), "HTTP error status");
            return Err(ProviderError::Http(format!(
                "HTTP {} from {}",
                status,
                redact(url)
            )));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = redact(url), bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = redact(url), error = %e, "Failed to read response body");
                Err(ProviderError::Http(format!("Failed to read response: {}", e)))
            }
        }
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url = redact(url), "HTTP GET request starting");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(
                url = redact(url),
                error = %e,
                is_connect = e.is_connect(),
                is_timeout = e.is_timeout(),
                "HTTP request failed"
            );
            ProviderError::Http(format!("Request failed: {}", e.without_url()))
        })?;

        debug!(
            url = redact(url),
            status = response.status().as_u16(),
            "HTTP response received"
        );
        Self::read_body(response, url).await
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, ProviderError> {
        trace!(url = redact(url), bytes = json_body.len(), "HTTP POST request starting");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(json_body.to_string())
            .send()
            .await
            .map_err(|e| {
                warn!(
                    url = redact(url),
                    error = %e,
                    is_timeout = e.is_timeout(),
                    "HTTP POST failed"
                );
                ProviderError::Http(format!("POST request failed: {}", e.without_url()))
            })?;

        debug!(
            url = redact(url),
            status = response.status().as_u16(),
            "HTTP response received"
        );
        Self::read_body(response, url).await
    }
}

/// Strips the query string so API keys never reach logs or error messages.
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
