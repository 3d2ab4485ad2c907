//! Background preloading of the prefetch cache.
//!
//! The [`PreloaderController`] owns at most one [`PreloadWorker`] task. The
//! worker first fills the cache to a target fraction of its capacity, marks
//! it loaded, then tops it up by one bundle per maintenance tick.
//!
//! ```ignore
//! let controller = PreloaderController::new(cache, generator, PreloaderConfig::default());
//! controller.start(&shutdown);
//! // ...
//! controller.stop();
//! ```

mod config;
mod controller;
mod worker;

pub use config::{
    PreloaderConfig, DEFAULT_FAILURE_COOLDOWN_SECS, DEFAULT_MAINTENANCE_INTERVAL_SECS,
    DEFAULT_TARGET_RATIO,
};
pub use controller::PreloaderController;
pub use worker::{MaintenanceOutcome, PreloadWorker};
