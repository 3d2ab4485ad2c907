//! Giphy GIF search provider.
//!
//! Supplies the reaction GIFs for the selection pool.
//!
//! # API Endpoint
//!
//! - Search: `https://api.giphy.com/v1/gifs/search?api_key={KEY}&q={QUERY}&limit={N}&rating={R}`

use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{AssetSearch, ProviderError};

/// Giphy search endpoint.
pub const GIPHY_SEARCH_URL: &str = "https://api.giphy.com/v1/gifs/search";

/// Default content rating.
pub const DEFAULT_RATING: &str = "g";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Gif>,
}

#[derive(Debug, Deserialize)]
struct Gif {
    images: Option<Renditions>,
}

#[derive(Debug, Deserialize)]
struct Renditions {
    original: Option<Rendition>,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: Option<String>,
}

/// GIF search over the Giphy API.
pub struct GiphyProvider<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    rating: String,
}

impl<C: AsyncHttpClient> GiphyProvider<C> {
    /// Creates a provider with the default rating.
    pub fn new(http_client: C, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            rating: DEFAULT_RATING.to_string(),
        }
    }

    /// Overrides the content rating.
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    fn build_url(&self, query: &str, limit: u32) -> Result<String, ProviderError> {
        let limit = limit.to_string();
        reqwest::Url::parse_with_params(
            GIPHY_SEARCH_URL,
            [
                ("api_key", self.api_key.as_str()),
                ("q", query),
                ("limit", limit.as_str()),
                ("rating", self.rating.as_str()),
            ],
        )
        .map(String::from)
        .map_err(|e| ProviderError::Encoding(format!("Invalid search URL: {}", e)))
    }

    fn parse_response(body: &[u8]) -> Result<Vec<String>, ProviderError> {
        let response: SearchResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderError::MalformedResponse(format!("Invalid JSON: {}", e)))?;

        Ok(response
            .data
            .into_iter()
            .filter_map(|gif| gif.images?.original?.url)
            .filter(|url| !url.is_empty())
            .collect())
    }
}

impl<C: AsyncHttpClient> AssetSearch for GiphyProvider<C> {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<String>, ProviderError> {
        let url = self.build_url(query, limit)?;
        let body = self.http_client.get(&url).await?;
        let urls = Self::parse_response(&body)?;

        debug!(query, results = urls.len(), "Asset search completed");
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::tests::MockAsyncHttpClient;

    const RESPONSE: &str = r#"{
        "data": [
            {"images": {"original": {"url": "https://media.giphy.com/a.gif"}}},
            {"images": {"original": {"url": ""}}},
            {"images": {}},
            {"images": {"original": {"url": "https://media.giphy.com/b.gif"}}}
        ],
        "pagination": {"count": 4}
    }"#;

    #[tokio::test]
    async fn search_extracts_original_urls() {
        let mock = MockAsyncHttpClient::with_json(RESPONSE);
        let provider = GiphyProvider::new(mock.clone(), "k".to_string());

        let urls = provider.search("clapping", 50).await.unwrap();

        assert_eq!(
            urls,
            vec![
                "https://media.giphy.com/a.gif".to_string(),
                "https://media.giphy.com/b.gif".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn search_url_carries_parameters() {
        let mock = MockAsyncHttpClient::with_json(r#"{"data":[]}"#);
        let provider = GiphyProvider::new(mock.clone(), "secret".to_string()).with_rating("pg");

        provider.search("slow clap", 25).await.unwrap();

        let url = mock.last_request().unwrap().url;
        assert!(url.starts_with("https://api.giphy.com/v1/gifs/search?"));
        assert!(url.contains("api_key=secret"));
        assert!(url.contains("q=slow+clap"));
        assert!(url.contains("limit=25"));
        assert!(url.contains("rating=pg"));
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let provider = GiphyProvider::new(
            MockAsyncHttpClient::with_json(r#"{"data":[]}"#),
            "k".to_string(),
        );

        assert!(provider.search("clapping", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let provider = GiphyProvider::new(MockAsyncHttpClient::with_json("nope"), "k".to_string());

        let result = provider.search("clapping", 50).await;

        assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
    }
}
