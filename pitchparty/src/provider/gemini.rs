//! Google generative-language provider.
//!
//! Text comes from a Gemini model through `generateContent`; images come
//! from an Imagen model through `predict`. Both endpoints authenticate with
//! an API key passed as a query parameter.
//!
//! # API Endpoints
//!
//! - Text: `{base}/models/{model}:generateContent?key={API_KEY}`
//! - Image: `{base}/models/{model}:predict?key={API_KEY}`
//!
//! Generated images are returned inline as base64 and handed back to callers
//! as a `data:` URI, ready to embed.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::{ContentProvider, ProviderError, TextPrompt};

/// Base URL of the generative-language API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default text model.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-pro-latest";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";

/// Prefix applied to every image prompt.
pub const IMAGE_PROMPT_PREFIX: &str = "generate an image of: ";

const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

/// Gemini text and Imagen image provider.
pub struct GeminiProvider<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl<C: AsyncHttpClient> GeminiProvider<C> {
    /// Creates a provider using the default models.
    pub fn new(http_client: C, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Overrides the text model.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Overrides the image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    fn model_url(&self, model: &str, method: &str) -> Result<String, ProviderError> {
        let endpoint = format!("{}/models/{}:{}", GEMINI_API_BASE, model, method);
        reqwest::Url::parse_with_params(&endpoint, [("key", self.api_key.as_str())])
            .map(String::from)
            .map_err(|e| ProviderError::Encoding(format!("Invalid model URL: {}", e)))
    }

    fn text_request_body(prompt: &TextPrompt) -> String {
        let mut generation_config = json!({ "temperature": prompt.temperature });
        if let Some(tokens) = prompt.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(tokens);
        }

        json!({
            "contents": [{ "parts": [{ "text": prompt.render() }] }],
            "generationConfig": generation_config,
        })
        .to_string()
    }

    fn image_request_body(prompt: &str) -> String {
        json!({
            "instances": [{ "prompt": format!("{}{}", IMAGE_PROMPT_PREFIX, prompt) }],
            "parameters": { "sampleCount": 1 },
        })
        .to_string()
    }

    fn parse_text_response(body: &[u8]) -> Result<String, ProviderError> {
        let response: GenerateContentResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderError::MalformedResponse(format!("Invalid JSON: {}", e)))?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse(
                "No text in model response".to_string(),
            ));
        }

        Ok(text)
    }

    fn parse_image_response(body: &[u8]) -> Result<String, ProviderError> {
        let response: PredictResponse = serde_json::from_slice(body)
            .map_err(|e| ProviderError::MalformedResponse(format!("Invalid JSON: {}", e)))?;

        let prediction = response
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("No image predictions".to_string()))?;

        let data = prediction
            .bytes_base64_encoded
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("Empty image payload".to_string()))?;

        let mime = prediction
            .mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());

        Ok(format!("data:{};base64,{}", mime, data))
    }
}

impl<C: AsyncHttpClient> ContentProvider for GeminiProvider<C> {
    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, ProviderError> {
        let url = self.model_url(&self.text_model, "generateContent")?;
        let body = Self::text_request_body(prompt);

        debug!(model = %self.text_model, "Requesting text generation");
        let response = self.http_client.post_json(&url, &body).await?;
        Self::parse_text_response(&response)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = self.model_url(&self.image_model, "predict")?;
        let body = Self::image_request_body(prompt);

        debug!(model = %self.image_model, "Requesting image generation");
        let response = self.http_client.post_json(&url, &body).await?;
        Self::parse_image_response(&response)
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}
