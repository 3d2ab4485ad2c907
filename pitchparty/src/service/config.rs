//! Service configuration types.

use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;
use crate::config::{ConfigFile, DEFAULT_EMPTY_WAIT_MS};
use crate::preloader::PreloaderConfig;
use crate::retry::RetryPolicy;
use crate::selection::SelectionConfig;

/// Configuration for the game service.
///
/// Combines everything needed to create and run the service.
///
/// # Example
///
/// ```
/// use pitchparty::service::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .capacity(10)
///     .preload(false)
///     .build();
///
/// assert_eq!(config.capacity(), 10);
/// assert!(!config.preload());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Prefetch cache capacity
    capacity: usize,
    /// Whether the preloader starts with the service
    preload: bool,
    /// Wait applied to a request that finds the cache empty during the initial load
    empty_wait: Duration,
    /// Preloader timing and occupancy
    preloader: PreloaderConfig,
    /// Retry policy for every remote call
    retry: RetryPolicy,
    /// Asset pool settings
    selection: SelectionConfig,
}

impl ServiceConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Derive the service configuration from a loaded config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        Self::builder()
            .capacity(file.cache.size)
            .preload(file.cache.preload)
            .empty_wait(Duration::from_millis(file.cache.empty_wait_ms))
            .preloader(
                PreloaderConfig::default()
                    .with_target_ratio(file.preloader.target_ratio)
                    .with_maintenance_interval(Duration::from_secs(
                        file.preloader.maintenance_interval,
                    ))
                    .with_failure_cooldown(Duration::from_secs(file.preloader.failure_cooldown)),
            )
            .retry(RetryPolicy::new(
                file.retry.max_retries,
                Duration::from_millis(file.retry.base_delay_ms),
            ))
            .selection(SelectionConfig {
                query: file.assets.query.clone(),
                limit: file.assets.limit,
                ttl: Duration::from_secs(file.assets.ttl),
                draw_attempts: file.assets.draw_attempts,
            })
            .build()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn preload(&self) -> bool {
        self.preload
    }

    pub fn empty_wait(&self) -> Duration {
        self.empty_wait
    }

    pub fn preloader(&self) -> &PreloaderConfig {
        &self.preloader
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn selection(&self) -> &SelectionConfig {
        &self.selection
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            preload: true,
            empty_wait: Duration::from_millis(DEFAULT_EMPTY_WAIT_MS),
            preloader: PreloaderConfig::default(),
            retry: RetryPolicy::default(),
            selection: SelectionConfig::default(),
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Cache capacity; zero is raised to one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity.max(1);
        self
    }

    pub fn preload(mut self, preload: bool) -> Self {
        self.config.preload = preload;
        self
    }

    pub fn empty_wait(mut self, wait: Duration) -> Self {
        self.config.empty_wait = wait;
        self
    }

    pub fn preloader(mut self, preloader: PreloaderConfig) -> Self {
        self.config.preloader = preloader;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn selection(mut self, selection: SelectionConfig) -> Self {
        self.config.selection = selection;
        self
    }

    pub fn build(self) -> ServiceConfig {
        self.config
    }
}
