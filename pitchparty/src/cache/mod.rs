//! In-memory bundle buffer.
//!
//! Provides the bounded FIFO that the preloader fills and request handling
//! drains.

mod bounded;

pub use bounded::{PrefetchCache, DEFAULT_CAPACITY};
