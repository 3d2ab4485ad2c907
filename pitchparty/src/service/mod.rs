//! High-level service facade for PitchParty.
//!
//! This module wires the prefetch cache, the bundle generator and the
//! background preloader behind one owned context object.
//!
//! # Example
//!
//! ```ignore
//! use pitchparty::config::ConfigFile;
//! use pitchparty::service::build_service;
//! use tokio_util::sync::CancellationToken;
//!
//! let mut config = ConfigFile::load()?;
//! config.apply_env_overrides();
//!
//! let service = build_service(&config)?;
//! service.start_preloader_if_enabled();
//!
//! let bundle = service.pop_or_generate(&CancellationToken::new()).await?;
//! println!("{}", bundle.business_name());
//!
//! service.shutdown().await;
//! ```

mod builder;
mod config;
mod error;
mod facade;

pub use builder::{build_service, create_asset_search, create_content_provider, LiveService};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::ServiceError;
pub use facade::{CacheStatus, GameService};
