//! PitchParty - content prefetching for the PitchParty party game
//!
//! Each round of the game needs a bundle: a generated business idea
//! (name and slogan), two generated images and a reaction asset. Producing
//! one takes several slow remote calls, so bundles are generated ahead of
//! time and held in a bounded FIFO cache.
//!
//! # High-Level API
//!
//! The [`service`] module wires everything behind one context object:
//!
//! ```ignore
//! use pitchparty::config::ConfigFile;
//! use pitchparty::service::build_service;
//!
//! let config = ConfigFile::load()?;
//! let service = build_service(&config)?;
//! service.start_preloader_if_enabled();
//!
//! let bundle = service.pop_or_generate(&cancel).await?;
//! ```
//!
//! # Components
//!
//! - [`retry`] - exponential backoff with jitter for remote calls
//! - [`provider`] - content and asset capabilities plus the Gemini and Giphy clients
//! - [`selection`] - deduplicating random picker over a refreshed asset pool
//! - [`content`] - the bundle type and the generation pipeline
//! - [`cache`] - bounded FIFO prefetch cache
//! - [`preloader`] - background fill and maintenance loop

pub mod cache;
pub mod config;
pub mod content;
pub mod logging;
pub mod preloader;
pub mod provider;
pub mod retry;
pub mod selection;
pub mod service;

/// Version of the PitchParty library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
