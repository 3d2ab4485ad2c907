//! Builds a [`GameService`] backed by the real remote providers.

use tracing::{info, warn};

use super::config::ServiceConfig;
use super::error::ServiceError;
use super::facade::GameService;
use crate::config::{ConfigFile, ENV_GIPHY_API_KEY, ENV_GOOGLE_API_KEY};
use crate::provider::{AsyncReqwestClient, GeminiProvider, GiphyProvider};

/// Service wired to Gemini for content and Giphy for assets.
pub type LiveService =
    GameService<GeminiProvider<AsyncReqwestClient>, GiphyProvider<AsyncReqwestClient>>;

/// Create the content provider from configuration.
///
/// A Google API key is required; there is no way to generate bundles
/// without one.
pub fn create_content_provider(
    config: &ConfigFile,
) -> Result<GeminiProvider<AsyncReqwestClient>, ServiceError> {
    let api_key = config.provider.google_api_key.clone().ok_or_else(|| {
        ServiceError::Config(format!(
            "provider.google_api_key is not set (or export {})",
            ENV_GOOGLE_API_KEY
        ))
    })?;

    let http_client = AsyncReqwestClient::with_timeout(config.provider.timeout)
        .map_err(|e| ServiceError::HttpClient(e.to_string()))?;

    Ok(GeminiProvider::new(http_client, api_key)
        .with_text_model(config.provider.text_model.clone())
        .with_image_model(config.provider.image_model.clone()))
}

/// Create the asset search from configuration.
///
/// Returns `None` when no Giphy key is configured; bundles then carry the
/// placeholder asset.
pub fn create_asset_search(
    config: &ConfigFile,
) -> Result<Option<GiphyProvider<AsyncReqwestClient>>, ServiceError> {
    let Some(api_key) = config.assets.giphy_api_key.clone() else {
        warn!(
            variable = ENV_GIPHY_API_KEY,
            "No Giphy API key configured, using placeholder asset"
        );
        return Ok(None);
    };

    let http_client = AsyncReqwestClient::with_timeout(config.provider.timeout)
        .map_err(|e| ServiceError::HttpClient(e.to_string()))?;

    Ok(Some(
        GiphyProvider::new(http_client, api_key).with_rating(config.assets.rating.clone()),
    ))
}

/// Build the live service from a loaded configuration file.
///
/// The preloader is not started; call
/// [`GameService::start_preloader_if_enabled`] from within the runtime.
pub fn build_service(config: &ConfigFile) -> Result<LiveService, ServiceError> {
    let provider = create_content_provider(config)?;
    let search = create_asset_search(config)?;
    let service_config = ServiceConfig::from_config_file(config);

    info!(
        text_model = %config.provider.text_model,
        image_model = %config.provider.image_model,
        assets = search.is_some(),
        "Providers configured"
    );

    Ok(GameService::new(provider, search, service_config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_google_key_is_config_error() {
        let config = ConfigFile::default();

        let result = build_service(&config);

        match result {
            Err(ServiceError::Config(msg)) => assert!(msg.contains(ENV_GOOGLE_API_KEY)),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("service built without an API key"),
        }
    }

    #[test]
    fn test_asset_search_is_optional() {
        let mut config = ConfigFile::default();
        assert!(create_asset_search(&config).unwrap().is_none());

        config.assets.giphy_api_key = Some("gif-key".to_string());
        assert!(create_asset_search(&config).unwrap().is_some());
    }

    #[test]
    fn test_build_with_keys_uses_configured_capacity() {
        let mut config = ConfigFile::default();
        config.provider.google_api_key = Some("google-key".to_string());
        config.cache.size = 7;

        let service = build_service(&config).unwrap();

        assert_eq!(service.cache_status().capacity, 7);
        assert!(!service.cache_status().preloader_running);
    }
}
