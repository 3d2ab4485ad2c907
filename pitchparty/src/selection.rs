//! Deduplicating random picker over a time-expiring asset pool.
//!
//! The pool is filled from an [`AssetSearch`] collaborator and kept for a
//! fixed TTL. Picks draw at random, preferring entries that have not been
//! served yet; once every entry has been served the markers are cleared and
//! the cycle starts again.
//!
//! # Failure model
//!
//! [`SelectionCache::pick`] never fails. Without a search collaborator, or
//! when a refresh fails after retries, it returns [`PLACEHOLDER_ASSET`].
//!
//! # Locking
//!
//! Pool state sits behind a synchronous mutex that is never held across an
//! await. Refreshes are serialised by a separate async gate so concurrent
//! pickers that find the pool stale trigger exactly one fetch; the others
//! wait for it and then draw from the new pool.

use std::collections::HashSet;
use std::time::Duration;

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::provider::AssetSearch;
use crate::retry::RetryPolicy;

/// Asset returned whenever the pool cannot supply one.
pub const PLACEHOLDER_ASSET: &str = "https://media.giphy.com/media/3o7abB06u9bNzA8lu8/giphy.gif";

/// Default lifetime of a refreshed pool.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default number of random draws spent looking for an unserved entry.
pub const DEFAULT_DRAW_ATTEMPTS: u32 = 10;

/// Default search query.
pub const DEFAULT_QUERY: &str = "clapping";

/// Default number of results requested per refresh.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Selection cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Search query used to refresh the pool.
    pub query: String,
    /// Maximum results requested per refresh.
    pub limit: u32,
    /// How long a refreshed pool stays fresh.
    pub ttl: Duration,
    /// Random draws per pick before accepting a repeat.
    pub draw_attempts: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            limit: DEFAULT_SEARCH_LIMIT,
            ttl: DEFAULT_TTL,
            draw_attempts: DEFAULT_DRAW_ATTEMPTS,
        }
    }
}

#[derive(Debug, Default)]
struct Pool {
    entries: Vec<String>,
    served: HashSet<usize>,
    /// `None` once filled means the TTL is too long to represent: never stale.
    expires_at: Option<Instant>,
}

impl Pool {
    fn is_fresh(&self, now: Instant) -> bool {
        !self.entries.is_empty() && self.expires_at.map_or(true, |at| now < at)
    }

    fn replace(&mut self, urls: Vec<String>, expires_at: Option<Instant>) {
        let mut seen = HashSet::with_capacity(urls.len());
        let mut entries: Vec<String> = urls
            .into_iter()
            .filter(|u| seen.insert(u.clone()))
            .collect();
        entries.shuffle(&mut rand::rng());

        self.entries = entries;
        self.served.clear();
        self.expires_at = expires_at;
    }

    fn draw(&mut self, attempts: u32) -> String {
        if self.served.len() >= self.entries.len() {
            debug!(entries = self.entries.len(), "Selection pool exhausted, resetting markers");
            self.served.clear();
        }

        let mut rng = rand::rng();
        for _ in 0..attempts {
            let index = rng.random_range(0..self.entries.len());
            if self.served.insert(index) {
                return self.entries[index].clone();
            }
        }

        let index = rng.random_range(0..self.entries.len());
        self.served.insert(index);
        self.entries[index].clone()
    }
}

/// Random asset picker backed by a periodically refreshed pool.
pub struct SelectionCache<S: AssetSearch> {
    search: Option<S>,
    config: SelectionConfig,
    retry: RetryPolicy,
    pool: Mutex<Pool>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl<S: AssetSearch> SelectionCache<S> {
    /// Creates a selection cache.
    ///
    /// With `search` set to `None` every pick returns the placeholder and no
    /// remote call is ever made.
    pub fn new(search: Option<S>, config: SelectionConfig, retry: RetryPolicy) -> Self {
        Self {
            search,
            config,
            retry,
            pool: Mutex::new(Pool::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Picks an asset reference. Never fails.
    pub async fn pick(&self, cancel: &CancellationToken) -> String {
        let Some(search) = &self.search else {
            return PLACEHOLDER_ASSET.to_string();
        };

        if let Some(asset) = self.try_draw() {
            return asset;
        }

        let _gate = self.refresh_gate.lock().await;

        // Another picker may have refreshed while we waited for the gate.
        if let Some(asset) = self.try_draw() {
            return asset;
        }

        let result = self
            .retry
            .run(cancel, || search.search(&self.config.query, self.config.limit))
            .await;

        match result {
            Ok(urls) if !urls.is_empty() => {
                let mut pool = self.pool.lock();
                pool.replace(urls, Instant::now().checked_add(self.config.ttl));
                info!(
                    entries = pool.entries.len(),
                    query = %self.config.query,
                    "Selection pool refreshed"
                );
                pool.draw(self.config.draw_attempts)
            }
            Ok(_) => {
                warn!(
                    query = %self.config.query,
                    "Asset search returned no results, using placeholder"
                );
                PLACEHOLDER_ASSET.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Asset search failed, using placeholder");
                PLACEHOLDER_ASSET.to_string()
            }
        }
    }

    fn try_draw(&self) -> Option<String> {
        let mut pool = self.pool.lock();
        if !pool.is_fresh(Instant::now()) {
            return None;
        }
        Some(pool.draw(self.config.draw_attempts))
    }
}
