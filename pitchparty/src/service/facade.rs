//! Game service facade.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::ServiceConfig;
use super::error::ServiceError;
use crate::cache::PrefetchCache;
use crate::content::{Bundle, ContentGenerator, GenerateError};
use crate::preloader::PreloaderController;
use crate::provider::{AssetSearch, ContentProvider};
use crate::selection::SelectionCache;

/// Point-in-time view of the prefetch cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub size: usize,
    pub capacity: usize,
    pub loaded: bool,
    pub preloader_running: bool,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} bundles, {}, preloader {}",
            self.size,
            self.capacity,
            if self.loaded { "loaded" } else { "loading" },
            if self.preloader_running {
                "running"
            } else {
                "stopped"
            }
        )
    }
}

/// The service context shared by every request handler.
///
/// Owns the prefetch cache, the bundle generator and the preloader. One
/// instance is built at startup and shared by handle; there is no global
/// state.
pub struct GameService<P: ContentProvider, S: AssetSearch> {
    config: ServiceConfig,
    cache: Arc<PrefetchCache<Bundle>>,
    generator: Arc<ContentGenerator<P, S>>,
    preloader: PreloaderController<P, S>,
    shutdown: CancellationToken,
}

impl<P, S> GameService<P, S>
where
    P: ContentProvider + 'static,
    S: AssetSearch + 'static,
{
    /// Wires the service from a content provider and an optional asset search.
    ///
    /// Without an asset search every bundle carries the placeholder asset.
    /// The preloader is not started here.
    pub fn new(provider: P, search: Option<S>, config: ServiceConfig) -> Self {
        let retry = *config.retry();
        let selection = Arc::new(SelectionCache::new(
            search,
            config.selection().clone(),
            retry,
        ));
        let generator = Arc::new(ContentGenerator::new(provider, selection, retry));
        let cache = Arc::new(PrefetchCache::new(config.capacity()));
        let preloader = PreloaderController::new(
            Arc::clone(&cache),
            Arc::clone(&generator),
            *config.preloader(),
        );

        info!(
            capacity = cache.capacity(),
            preload = config.preload(),
            "Game service created"
        );

        Self {
            config,
            cache,
            generator,
            preloader,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Token cancelled when the service shuts down.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Returns a cached bundle, or generates one on demand.
    ///
    /// While the preloader is still on its initial fill, an empty cache gets
    /// one short wait before falling back to synchronous generation. With no
    /// preloader running nothing will arrive, so generation starts at once.
    /// An empty cache is never an error by itself.
    pub async fn pop_or_generate(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Bundle, ServiceError> {
        if let Some(bundle) = self.cache.pop() {
            debug!(remaining = self.cache.len(), "Served bundle from cache");
            return Ok(bundle);
        }

        if !self.cache.is_loaded() && self.preloader.is_running() {
            let wait = self.config.empty_wait();
            debug!(wait_ms = wait.as_millis() as u64, "Cache empty during initial load");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GenerateError::Cancelled.into()),
                _ = tokio::time::sleep(wait) => {}
            }
            if let Some(bundle) = self.cache.pop() {
                debug!(remaining = self.cache.len(), "Served bundle from cache after wait");
                return Ok(bundle);
            }
        }

        info!("Cache empty, generating bundle on demand");
        Ok(self.generator.generate(cancel).await?)
    }

    /// Generates one bundle, pushes it into the cache and returns it.
    pub async fn manual_fill(&self, cancel: &CancellationToken) -> Result<Bundle, ServiceError> {
        let bundle = self.generator.generate(cancel).await?;
        if self.cache.push(bundle.clone()).is_some() {
            debug!(capacity = self.cache.capacity(), "Cache full, evicted oldest bundle");
        }
        info!(size = self.cache.len(), "Manual fill added bundle");
        Ok(bundle)
    }

    pub fn cache_status(&self) -> CacheStatus {
        let (size, loaded) = self.cache.snapshot();
        CacheStatus {
            size,
            capacity: self.cache.capacity(),
            loaded,
            preloader_running: self.preloader.is_running(),
        }
    }

    /// Starts the background preloader; no-op if it is already running.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start_preloader(&self) -> bool {
        let started = self.preloader.start(&self.shutdown);
        if started {
            info!(
                capacity = self.cache.capacity(),
                target = self.config.preloader().target_for(self.cache.capacity()),
                "Content preloader started"
            );
        }
        started
    }

    /// Starts the preloader only when preloading is enabled.
    pub fn start_preloader_if_enabled(&self) -> bool {
        if !self.config.preload() {
            info!("Preloading disabled, bundles will be generated on demand");
            return false;
        }
        self.start_preloader()
    }

    /// Signals the preloader to stop without waiting for it.
    pub fn stop_preloader(&self) -> bool {
        self.preloader.stop()
    }

    /// Cancels all outstanding work and waits for the preloader to exit.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.preloader.stop_and_wait().await;
        info!(size = self.cache.len(), "Game service shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preloader::PreloaderConfig;
    use crate::provider::{ProviderError, TextPrompt};
    use crate::retry::RetryPolicy;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingProvider {
        ideas: AtomicUsize,
        fail: bool,
    }

    impl ContentProvider for CountingProvider {
        async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, ProviderError> {
            if self.fail {
                return Err(ProviderError::Http("HTTP 503".to_string()));
            }
            if prompt.inputs.contains("business_type") {
                let n = self.ideas.fetch_add(1, Ordering::SeqCst);
                Ok(format!("Name: Biz {} Slogan: Go {}", n, n))
            } else {
                Ok("a cat running a bank".to_string())
            }
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok("data:image/png;base64,AAAA".to_string())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct NoSearch;

    impl AssetSearch for NoSearch {
        async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<String>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn service(
        provider: CountingProvider,
        capacity: usize,
    ) -> GameService<CountingProvider, NoSearch> {
        let config = ServiceConfig::builder()
            .capacity(capacity)
            .empty_wait(Duration::from_millis(500))
            .retry(RetryPolicy::new(1, Duration::from_millis(10)))
            .preloader(PreloaderConfig::default())
            .build();
        GameService::new(provider, None, config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_fill_pushes_and_returns_bundle() {
        let service = service(CountingProvider::default(), 3);
        let cancel = CancellationToken::new();

        let bundle = service.manual_fill(&cancel).await.unwrap();

        assert_eq!(bundle.business_name(), "Biz 0");
        assert_eq!(service.cache_status().size, 1);
        assert_eq!(service.pop_or_generate(&cancel).await.unwrap(), bundle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_waits_once_for_initial_fill() {
        let service = service(CountingProvider::default(), 3);
        let cancel = CancellationToken::new();
        assert!(service.start_preloader());
        let start = tokio::time::Instant::now();

        let bundle = service.pop_or_generate(&cancel).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(bundle.business_name(), "Biz 0");
        service.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_generates_immediately_without_preloader() {
        let service = service(CountingProvider::default(), 3);
        let cancel = CancellationToken::new();
        let start = tokio::time::Instant::now();

        let bundle = service.pop_or_generate(&cancel).await.unwrap();

        assert_eq!(bundle.business_name(), "Biz 0");
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(!service.cache_status().loaded);
        assert_eq!(service.cache_status().size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_generates_immediately_once_loaded() {
        let service = service(CountingProvider::default(), 3);
        service.cache.mark_loaded();
        let cancel = CancellationToken::new();
        let start = tokio::time::Instant::now();

        service.pop_or_generate(&cancel).await.unwrap();

        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_propagates_generation_failure() {
        let provider = CountingProvider {
            fail: true,
            ..CountingProvider::default()
        };
        let service = service(provider, 3);
        service.cache.mark_loaded();

        let err = service
            .pop_or_generate(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Generate(GenerateError::BusinessIdea(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pop_cancelled_during_wait() {
        let service = service(CountingProvider::default(), 3);
        assert!(service.start_preloader());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service.pop_or_generate(&cancel).await.unwrap_err();

        assert!(err.is_cancelled());
        service.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reflects_preloader_lifecycle() {
        let service = service(CountingProvider::default(), 5);

        assert!(!service.cache_status().preloader_running);
        assert!(service.start_preloader());
        assert!(!service.start_preloader());
        assert!(service.cache_status().preloader_running);

        service.shutdown().await;

        let status = service.cache_status();
        assert!(!status.preloader_running);
        assert!(!service.start_preloader());
        assert!(!service.stop_preloader());
    }

    #[tokio::test]
    async fn test_disabled_preload_does_not_start() {
        let config = ServiceConfig::builder().preload(false).build();
        let service = GameService::new(CountingProvider::default(), None::<NoSearch>, config);

        assert!(!service.start_preloader_if_enabled());
        assert!(!service.cache_status().preloader_running);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let status = CacheStatus {
            size: 2,
            capacity: 5,
            loaded: true,
            preloader_running: false,
        };

        let json = serde_json::to_value(status).unwrap();

        assert_eq!(json["preloaderRunning"], false);
        assert_eq!(json["size"], 2);
        assert_eq!(status.to_string(), "2/5 bundles, loaded, preloader stopped");
    }
}
