//! Start/stop lifecycle of the background preloader.
//!
//! # State Machine
//!
//! ```text
//! Stopped --start()--> Running --stop()--> Stopping --worker exits--> Stopped
//! Running  --start()--> Running   (no-op)
//! Stopping --start()--> Stopping  (refused until the worker has exited)
//! Stopped  --stop()-->  Stopped   (no-op)
//! ```
//!
//! Each run gets a child of the caller's cancellation token, so both
//! [`PreloaderController::stop`] and the parent token halt the worker. The
//! handle of a stopped worker stays in the slot until the task finishes, so
//! at most one worker task exists per controller at any time. The slot is
//! guarded by a single lock that is never held across an await.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::PreloaderConfig;
use super::worker::PreloadWorker;
use crate::cache::PrefetchCache;
use crate::content::{Bundle, ContentGenerator};
use crate::provider::{AssetSearch, ContentProvider};

struct RunningPreloader {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the preloader task for one cache.
pub struct PreloaderController<P: ContentProvider, S: AssetSearch> {
    cache: Arc<PrefetchCache<Bundle>>,
    generator: Arc<ContentGenerator<P, S>>,
    config: PreloaderConfig,
    running: Mutex<Option<RunningPreloader>>,
}

impl<P, S> PreloaderController<P, S>
where
    P: ContentProvider + 'static,
    S: AssetSearch + 'static,
{
    pub fn new(
        cache: Arc<PrefetchCache<Bundle>>,
        generator: Arc<ContentGenerator<P, S>>,
        config: PreloaderConfig,
    ) -> Self {
        Self {
            cache,
            generator,
            config,
            running: Mutex::new(None),
        }
    }

    /// Starts the preloader under `parent`.
    ///
    /// Returns false without doing anything if a worker task is still alive,
    /// whether running or draining after [`stop`](Self::stop), or if
    /// `parent` is already cancelled. Must be called within a Tokio runtime.
    pub fn start(&self, parent: &CancellationToken) -> bool {
        let mut running = self.running.lock();

        if let Some(current) = running.as_ref().filter(|r| !r.handle.is_finished()) {
            if current.cancel.is_cancelled() {
                warn!("Not starting content preloader: previous worker still stopping");
            } else {
                debug!("Content preloader already running");
            }
            return false;
        }
        if parent.is_cancelled() {
            warn!("Not starting content preloader: shutdown in progress");
            return false;
        }

        let cancel = parent.child_token();
        let worker = PreloadWorker::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.generator),
            self.config,
        );
        let handle = tokio::spawn(worker.run(cancel.clone()));

        *running = Some(RunningPreloader { cancel, handle });
        true
    }

    /// Signals the preloader to stop and returns immediately.
    ///
    /// In-flight generation is not awaited; the worker exits at its next
    /// checkpoint and its handle is kept until then. Returns false if
    /// nothing was running or a stop is already pending.
    pub fn stop(&self) -> bool {
        let mut running = self.running.lock();
        let Some(current) = running.as_ref() else {
            return false;
        };

        if current.handle.is_finished() {
            *running = None;
            return false;
        }
        if current.cancel.is_cancelled() {
            return false;
        }

        current.cancel.cancel();
        info!("Content preloader stop requested");
        true
    }

    /// Signals the preloader to stop and waits for the worker to exit.
    pub async fn stop_and_wait(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };

        running.cancel.cancel();
        if let Err(e) = running.handle.await {
            warn!(error = %e, "Content preloader task ended abnormally");
        }
    }

    /// Returns true while a worker task is alive, including one that has been
    /// told to stop but has not exited yet.
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }
}
