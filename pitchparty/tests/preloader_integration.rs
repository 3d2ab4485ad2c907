//! Integration tests for the prefetch service.
//!
//! These tests drive the complete flow through scripted providers:
//! - Initial fill to the target occupancy, then the loaded flag
//! - Requests served while the initial fill is still running
//! - One-bundle maintenance top-ups
//! - Preloader start/stop lifecycle
//!
//! Run with: `cargo test --test preloader_integration`

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use pitchparty::cache::PrefetchCache;
use pitchparty::content::{Bundle, ContentGenerator};
use pitchparty::preloader::{MaintenanceOutcome, PreloadWorker, PreloaderConfig};
use pitchparty::provider::{AssetSearch, ContentProvider, ProviderError, TextPrompt};
use pitchparty::retry::RetryPolicy;
use pitchparty::selection::{SelectionCache, SelectionConfig, PLACEHOLDER_ASSET};
use pitchparty::service::{GameService, ServiceConfig};

// ============================================================================
// Scripted Providers
// ============================================================================

/// Content provider taking one second per text call. Tracks the largest
/// number of calls ever in flight at once.
#[derive(Default)]
struct ScriptedProvider {
    ideas: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: Arc<AtomicUsize>,
}

impl ContentProvider for ScriptedProvider {
    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, ProviderError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if prompt.inputs.contains("business_type") {
            let n = self.ideas.fetch_add(1, Ordering::SeqCst);
            Ok(format!("**Name:** Startup {}\n**Slogan:** Disrupt {}", n, n))
        } else {
            Ok("a walrus pitching to investors".to_string())
        }
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok("data:image/png;base64,iVBORw0KGgo=".to_string())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Asset search returning a fixed pool, or failing every call.
struct ScriptedSearch {
    results: Vec<String>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSearch {
    fn with_results(results: &[&str]) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let search = Self {
            results: results.iter().map(|s| s.to_string()).collect(),
            fail: false,
            calls: Arc::clone(&calls),
        };
        (search, calls)
    }

    fn failing() -> (Self, Arc<AtomicUsize>) {
        let (mut search, calls) = Self::with_results(&[]);
        search.fail = true;
        (search, calls)
    }
}

impl AssetSearch for ScriptedSearch {
    async fn search(&self, _query: &str, _limit: u32) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Http("HTTP 502".to_string()));
        }
        Ok(self.results.clone())
    }
}

fn test_config(capacity: usize) -> ServiceConfig {
    ServiceConfig::builder()
        .capacity(capacity)
        .retry(RetryPolicy::new(2, Duration::from_millis(100)))
        .build()
}

fn service(capacity: usize) -> GameService<ScriptedProvider, ScriptedSearch> {
    GameService::new(ScriptedProvider::default(), None, test_config(capacity))
}

async fn wait_until_loaded(service: &GameService<ScriptedProvider, ScriptedSearch>) {
    for _ in 0..120 {
        if service.cache_status().loaded {
            return;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    panic!("cache never finished loading: {}", service.cache_status());
}

fn seed_bundle(n: usize) -> Bundle {
    Bundle::new(
        format!("Seed {}", n),
        "Seeded".to_string(),
        "data:image/png;base64,AA==".to_string(),
        "data:image/png;base64,AA==".to_string(),
        PLACEHOLDER_ASSET.to_string(),
    )
    .unwrap()
}

// ============================================================================
// Initial Fill
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_initial_fill_reaches_eighty_percent_then_loaded() {
    let service = service(5);

    assert!(service.start_preloader());
    wait_until_loaded(&service).await;

    let status = service.cache_status();
    assert_eq!(status.size, 4);
    assert_eq!(status.capacity, 5);
    assert!(status.loaded);
    assert!(status.preloader_running);

    service.shutdown().await;
    assert!(!service.cache_status().preloader_running);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_during_initial_load_never_fail() {
    let service = Arc::new(service(5));
    service.start_preloader();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.pop_or_generate(&CancellationToken::new()).await
        }));
    }

    let mut names = HashSet::new();
    for handle in handles {
        let bundle = handle.await.unwrap().expect("request failed during initial load");
        assert!(bundle.business_name().starts_with("Startup "));
        assert_eq!(bundle.asset(), PLACEHOLDER_ASSET);
        names.insert(bundle.business_name().to_string());
    }
    assert_eq!(names.len(), 6, "every request gets a distinct bundle");

    service.shutdown().await;
}

// ============================================================================
// Maintenance
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_maintenance_tick_at_two_of_five_pushes_exactly_one() {
    let retry = RetryPolicy::new(2, Duration::from_millis(100));
    let selection = Arc::new(SelectionCache::<ScriptedSearch>::new(
        None,
        SelectionConfig::default(),
        retry,
    ));
    let generator = Arc::new(ContentGenerator::new(
        ScriptedProvider::default(),
        selection,
        retry,
    ));
    let cache = Arc::new(PrefetchCache::new(5));
    cache.push(seed_bundle(0));
    cache.push(seed_bundle(1));
    cache.mark_loaded();

    let worker = PreloadWorker::new(Arc::clone(&cache), generator, PreloaderConfig::default());
    let cancel = CancellationToken::new();

    assert_eq!(worker.maintain_once(&cancel).await, MaintenanceOutcome::Pushed);
    assert_eq!(cache.len(), 3);

    assert_eq!(worker.maintain_once(&cancel).await, MaintenanceOutcome::Pushed);
    assert_eq!(worker.maintain_once(&cancel).await, MaintenanceOutcome::AtTarget);
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.pop().unwrap().business_name(), "Seed 0");
}

#[tokio::test(start_paused = true)]
async fn test_maintenance_refills_after_requests_drain_cache() {
    let service = service(5);
    service.start_preloader();
    wait_until_loaded(&service).await;

    let cancel = CancellationToken::new();
    service.pop_or_generate(&cancel).await.unwrap();
    service.pop_or_generate(&cancel).await.unwrap();
    assert_eq!(service.cache_status().size, 2);

    // Two maintenance ticks, one bundle each.
    tokio::time::sleep(Duration::from_secs(65)).await;

    assert_eq!(service.cache_status().size, 4);
    service.shutdown().await;
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_start_and_stop_are_idempotent() {
    let service = service(5);

    assert!(!service.stop_preloader());
    assert!(service.start_preloader());
    assert!(!service.start_preloader());
    assert!(service.stop_preloader());
    assert!(!service.stop_preloader());

    // A stopped preloader can be started again once its worker has exited.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!service.cache_status().preloader_running);
    assert!(service.start_preloader());
    service.shutdown().await;
    assert!(!service.start_preloader());
}

#[tokio::test(start_paused = true)]
async fn test_restart_while_stopping_never_runs_two_workers() {
    let provider = ScriptedProvider::default();
    let max_in_flight = Arc::clone(&provider.max_in_flight);
    let service = GameService::new(provider, None::<ScriptedSearch>, test_config(5));

    assert!(service.start_preloader());
    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert!(service.stop_preloader());
    assert!(!service.start_preloader(), "previous worker is still draining");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(service.cache_status().preloader_running);

    // The in-flight call finishes at 3s and the worker exits at its next
    // checkpoint.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!service.cache_status().preloader_running);
    assert!(service.start_preloader());
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    service.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_pop_without_preloader_does_not_wait() {
    let service = GameService::new(
        ScriptedProvider::default(),
        None::<ScriptedSearch>,
        ServiceConfig::builder()
            .capacity(5)
            .empty_wait(Duration::from_secs(30))
            .build(),
    );
    let start = tokio::time::Instant::now();

    let bundle = service.pop_or_generate(&CancellationToken::new()).await.unwrap();

    // Three one-second text calls and no empty-cache wait.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
    assert_eq!(bundle.business_name(), "Startup 0");
}

#[tokio::test(start_paused = true)]
async fn test_manual_fill_without_preloader() {
    let service = service(2);
    let cancel = CancellationToken::new();

    for _ in 0..3 {
        service.manual_fill(&cancel).await.unwrap();
    }

    let status = service.cache_status();
    assert_eq!(status.size, 2);
    assert!(!status.loaded);
    assert_eq!(
        service.pop_or_generate(&cancel).await.unwrap().business_name(),
        "Startup 1"
    );
}

// ============================================================================
// Assets
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_bundles_draw_assets_from_one_search() {
    let (search, calls) = ScriptedSearch::with_results(&["gif-a", "gif-b", "gif-c"]);
    let service = GameService::new(ScriptedProvider::default(), Some(search), test_config(5));
    let cancel = CancellationToken::new();

    for _ in 0..3 {
        let bundle = service.manual_fill(&cancel).await.unwrap();
        assert!(["gif-a", "gif-b", "gif-c"].contains(&bundle.asset()));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failing_search_falls_back_to_placeholder() {
    let (search, calls) = ScriptedSearch::failing();
    let service = GameService::new(ScriptedProvider::default(), Some(search), test_config(5));

    let bundle = service.manual_fill(&CancellationToken::new()).await.unwrap();

    assert_eq!(bundle.asset(), PLACEHOLDER_ASSET);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
