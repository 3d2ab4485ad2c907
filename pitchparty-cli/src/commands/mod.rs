//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (init, show, path)
//! - [`draw`] - Produce one bundle and print it as JSON
//! - [`fill`] - Generate bundles into the cache
//! - [`run`] - Main command (keep the cache warm until Ctrl-C)

pub mod config;
pub mod draw;
pub mod fill;
pub mod run;
