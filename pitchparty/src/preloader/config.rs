//! Preloader timing and occupancy settings.

use std::time::Duration;

/// Default fraction of capacity the preloader keeps filled.
pub const DEFAULT_TARGET_RATIO: f64 = 0.8;

/// Default interval between maintenance checks (30 seconds).
pub const DEFAULT_MAINTENANCE_INTERVAL_SECS: u64 = 30;

/// Default pause after a failed initial-fill generation (5 seconds).
pub const DEFAULT_FAILURE_COOLDOWN_SECS: u64 = 5;

/// Preloader settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreloaderConfig {
    /// Fraction of capacity to keep filled, in `(0.0, 1.0]`.
    pub target_ratio: f64,
    /// Interval between maintenance top-ups.
    pub maintenance_interval: Duration,
    /// Pause before retrying a failed initial-fill slot.
    pub failure_cooldown: Duration,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            target_ratio: DEFAULT_TARGET_RATIO,
            maintenance_interval: Duration::from_secs(DEFAULT_MAINTENANCE_INTERVAL_SECS),
            failure_cooldown: Duration::from_secs(DEFAULT_FAILURE_COOLDOWN_SECS),
        }
    }
}

impl PreloaderConfig {
    /// Sets the target ratio, clamped to `(0.0, 1.0]`.
    ///
    /// Non-finite or non-positive values fall back to the default.
    pub fn with_target_ratio(mut self, ratio: f64) -> Self {
        self.target_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio.min(1.0)
        } else {
            DEFAULT_TARGET_RATIO
        };
        self
    }

    /// Sets the maintenance interval. Zero is raised to one millisecond.
    pub fn with_maintenance_interval(mut self, interval: Duration) -> Self {
        self.maintenance_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_failure_cooldown(mut self, cooldown: Duration) -> Self {
        self.failure_cooldown = cooldown;
        self
    }

    /// Target occupancy for a cache of the given capacity, rounded down.
    pub fn target_for(&self, capacity: usize) -> usize {
        ((capacity as f64) * self.target_ratio).floor() as usize
    }
}
