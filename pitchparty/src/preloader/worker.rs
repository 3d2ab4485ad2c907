//! Background fill loop.
//!
//! # Phases
//!
//! ```text
//! initial fill ──► mark loaded ──► maintenance
//!
//! initial fill:  generate + push until the target is reached
//!                failure → cooldown, retry the same slot
//! maintenance:   every interval, below target → generate + push one bundle
//!                failure → logged, skipped until the next tick
//! ```
//!
//! The cancellation token is checked before every unit of work and observed
//! by every wait, including retry backoffs inside generation.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::PreloaderConfig;
use crate::cache::PrefetchCache;
use crate::content::{Bundle, ContentGenerator};
use crate::provider::{AssetSearch, ContentProvider};

/// Result of a single maintenance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceOutcome {
    /// Cache was at or above target; nothing generated.
    AtTarget,
    /// One bundle was generated and pushed.
    Pushed,
    /// Generation failed; the next tick will try again.
    Failed,
    /// Cancellation fired during generation.
    Cancelled,
}

/// Fills a prefetch cache in the background.
pub struct PreloadWorker<P: ContentProvider, S: AssetSearch> {
    cache: Arc<PrefetchCache<Bundle>>,
    generator: Arc<ContentGenerator<P, S>>,
    config: PreloaderConfig,
}

impl<P: ContentProvider, S: AssetSearch> PreloadWorker<P, S> {
    pub fn new(
        cache: Arc<PrefetchCache<Bundle>>,
        generator: Arc<ContentGenerator<P, S>>,
        config: PreloaderConfig,
    ) -> Self {
        Self {
            cache,
            generator,
            config,
        }
    }

    /// Target occupancy for this worker's cache.
    pub fn target(&self) -> usize {
        self.config.target_for(self.cache.capacity())
    }

    /// Fills the cache up to the target and marks it loaded.
    ///
    /// The number of bundles to generate is fixed when the phase starts. A
    /// failed slot is retried after the cooldown until it succeeds. Returns
    /// false if cancellation stopped the fill before it completed, in which
    /// case the cache is not marked loaded.
    pub async fn initial_fill(&self, cancel: &CancellationToken) -> bool {
        let target = self.target();
        let missing = target.saturating_sub(self.cache.len());
        info!(
            target,
            missing,
            capacity = self.cache.capacity(),
            "Initial preload starting"
        );

        let mut filled = 0;
        while filled < missing {
            if cancel.is_cancelled() {
                info!(filled, missing, "Preloader stopped during initial load");
                return false;
            }

            match self.generator.generate(cancel).await {
                Ok(bundle) => {
                    self.cache.push(bundle);
                    filled += 1;
                    info!(
                        progress = filled,
                        missing,
                        size = self.cache.len(),
                        "Initial preload: generated bundle"
                    );
                }
                Err(e) if e.is_cancelled() => {
                    info!(filled, missing, "Preloader stopped during initial load");
                    return false;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        cooldown_secs = self.config.failure_cooldown.as_secs_f64(),
                        "Failed to generate bundle during initial load"
                    );
                    if !cooldown(cancel, self.config.failure_cooldown).await {
                        info!(filled, missing, "Preloader stopped during initial load");
                        return false;
                    }
                }
            }
        }

        self.cache.mark_loaded();
        info!(size = self.cache.len(), "Initial preload completed");
        true
    }

    /// Generates and pushes exactly one bundle if the cache is below target.
    pub async fn maintain_once(&self, cancel: &CancellationToken) -> MaintenanceOutcome {
        let size = self.cache.len();
        let target = self.target();
        if size >= target {
            debug!(size, target, "Cache at target, nothing to do");
            return MaintenanceOutcome::AtTarget;
        }

        info!(size, target, "Cache low, generating bundle");
        match self.generator.generate(cancel).await {
            Ok(bundle) => {
                self.cache.push(bundle);
                info!(size = self.cache.len(), target, "Maintenance bundle added");
                MaintenanceOutcome::Pushed
            }
            Err(e) if e.is_cancelled() => MaintenanceOutcome::Cancelled,
            Err(e) => {
                warn!(error = %e, "Failed to generate bundle during maintenance");
                MaintenanceOutcome::Failed
            }
        }
    }

    /// Runs the initial fill and then the maintenance loop until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        info!(
            capacity = self.cache.capacity(),
            target = self.target(),
            interval_secs = self.config.maintenance_interval.as_secs(),
            "Content preloader starting"
        );

        if !self.initial_fill(&cancel).await {
            return;
        }

        let mut interval = tokio::time::interval(self.config.maintenance_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Content preloader stopped");
                    break;
                }

                _ = interval.tick() => {
                    if self.maintain_once(&cancel).await == MaintenanceOutcome::Cancelled {
                        info!("Content preloader stopped during maintenance");
                        break;
                    }
                }
            }
        }
    }
}

/// Sleeps for `duration` unless cancelled first. Returns false on cancel.
async fn cooldown(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
