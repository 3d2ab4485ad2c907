//! Bounded FIFO of pre-generated bundles.
//!
//! ```text
//!  push ─►  [ newest | ... | oldest ]  ─► pop
//!                                      ─► evicted when full
//! ```
//!
//! All operations take the same lock, so they are atomic with respect to
//! each other. The lock is never held across an await.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::debug;

/// Default cache capacity.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug)]
struct Inner<T> {
    items: VecDeque<T>,
    loaded: bool,
}

/// Capacity-bounded FIFO with an "initial load complete" flag.
///
/// Pushing into a full cache evicts the oldest entry first, so the length
/// never exceeds the capacity. The loaded flag only ever goes from false to
/// true.
#[derive(Debug)]
pub struct PrefetchCache<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
}

impl<T> PrefetchCache<T> {
    /// Creates an empty cache. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                loaded: false,
            }),
        }
    }

    /// Appends an item, returning the evicted oldest item if the cache was
    /// full.
    pub fn push(&self, item: T) -> Option<T> {
        let mut inner = self.inner.lock();
        let evicted = if inner.items.len() >= self.capacity {
            inner.items.pop_front()
        } else {
            None
        };
        inner.items.push_back(item);

        if evicted.is_some() {
            debug!(capacity = self.capacity, "Prefetch cache full, evicted oldest entry");
        }
        evicted
    }

    /// Removes and returns the oldest item, or `None` when empty.
    pub fn pop(&self) -> Option<T> {
        self.inner.lock().items.pop_front()
    }

    /// Current number of items.
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Marks the initial load as complete. Idempotent.
    pub fn mark_loaded(&self) {
        self.inner.lock().loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.lock().loaded
    }

    /// Length and loaded flag read under one lock.
    pub fn snapshot(&self) -> (usize, bool) {
        let inner = self.inner.lock();
        (inner.items.len(), inner.loaded)
    }
}

impl<T> Default for PrefetchCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
