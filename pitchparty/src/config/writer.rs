//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let google_api_key = config.provider.google_api_key.as_deref().unwrap_or("");
    let giphy_api_key = config.assets.giphy_api_key.as_deref().unwrap_or("");

    format!(
        r#"[provider]
; Google generative-language API key (required to generate content)
; Get one at: https://aistudio.google.com/app/apikey
; The GOOGLE_API_KEY environment variable overrides this value.
google_api_key = {}
; Model used for business names, slogans and image prompts
text_model = {}
; Model used to render images
image_model = {}
; HTTP request timeout in seconds (default: 60)
timeout = {}

[assets]
; Giphy API key for the reaction GIF. Leave empty to always use the placeholder.
; The GIPHY_API_KEY environment variable overrides this value.
giphy_api_key = {}
; Search query used to refresh the GIF pool
query = {}
; Number of GIFs requested per refresh (default: 50)
limit = {}
; Content rating: g, pg, pg-13 or r (default: g)
rating = {}
; Seconds before the GIF pool is refreshed (default: 3600)
ttl = {}
; Random draws spent looking for an unseen GIF before allowing a repeat (default: 10)
draw_attempts = {}

[cache]
; Maximum number of pre-generated bundles (default: 20)
; The CACHE_SIZE environment variable overrides this value.
size = {}
; Start the background preloader with the service (default: true)
; The ENABLE_PRELOAD environment variable overrides this value.
preload = {}
; Milliseconds a request waits for the initial load before generating its own bundle
empty_wait_ms = {}

[preloader]
; Fraction of the cache kept filled, greater than 0 and at most 1 (default: 0.8)
target_ratio = {}
; Seconds between maintenance top-ups (default: 30)
maintenance_interval = {}
; Seconds to wait after a failed generation during the initial fill (default: 5)
failure_cooldown = {}

[retry]
; Retries after the first attempt for each remote call (default: 5)
max_retries = {}
; Delay before the first retry in milliseconds; doubles on every retry (default: 1000)
base_delay_ms = {}

[logging]
; Directory for the log file (default: logs)
directory = {}
; Log file name, truncated at every start (default: pitchparty.log)
file = {}
"#,
        google_api_key,
        config.provider.text_model,
        config.provider.image_model,
        config.provider.timeout,
        giphy_api_key,
        config.assets.query,
        config.assets.limit,
        config.assets.rating,
        config.assets.ttl,
        config.assets.draw_attempts,
        config.cache.size,
        config.cache.preload,
        config.cache.empty_wait_ms,
        config.preloader.target_ratio,
        config.preloader.maintenance_interval,
        config.preloader.failure_cooldown,
        config.retry.max_retries,
        config.retry.base_delay_ms,
        config.logging.directory.to_string_lossy(),
        config.logging.file,
    )
}
