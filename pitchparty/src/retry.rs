//! Bounded exponential backoff for unreliable remote calls.
//!
//! Every remote call made while building a bundle (text generation, image
//! generation, asset search) goes through [`RetryPolicy::run`]. The policy
//! retries transient failures with an exponentially growing, jittered delay
//! and gives up after a fixed number of retries.
//!
//! # Delay schedule
//!
//! ```text
//! retry n waits  base_delay × 2^(n-1)  +  up to 10% jitter
//!
//! base 1s:  attempt 1 ─ 1.0s ─ attempt 2 ─ 2.0s ─ attempt 3 ─ 4.0s ─ ...
//! ```
//!
//! The wait between attempts observes a [`CancellationToken`], so shutdown is
//! never held up by a pending retry sleep.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound of the random jitter, as a fraction of the computed delay.
pub const JITTER_FRACTION: f64 = 0.1;

/// Classifies errors as worth retrying or not.
///
/// A malformed response will not fix itself by repeating the same call, so
/// errors of that kind should return `false` and are surfaced immediately
/// without consuming retry budget.
pub trait Retryable {
    /// Returns true if another attempt could succeed.
    fn is_retryable(&self) -> bool {
        true
    }
}

/// Failure of a retried operation.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the last error.
    #[error("operation failed after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    /// The operation failed with an error that is not worth retrying.
    #[error("operation failed with a non-retryable error: {0}")]
    Rejected(#[source] E),

    /// Cancellation fired while waiting for the next attempt.
    #[error("operation cancelled while waiting to retry")]
    Cancelled,
}

impl<E> RetryError<E> {
    /// Returns true if the operation was abandoned due to cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Retry policy: how many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = `max_retries + 1`).
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and base delay.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based), without jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let multiplier = 2u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(multiplier)
    }

    /// Delay before retry number `retry` (1-based), with up to +10% jitter.
    pub fn jittered_backoff(&self, retry: u32) -> Duration {
        let delay = self.backoff(retry);
        let jitter = rand::rng().random::<f64>() * JITTER_FRACTION;
        Duration::try_from_secs_f64(delay.as_secs_f64() * (1.0 + jitter)).unwrap_or(delay)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable
    /// error, runs out of retries, or `cancel` fires during a backoff wait.
    ///
    /// The operation itself is never interrupted; cancellation is observed
    /// only between attempts.
    pub async fn run<T, E, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        E: Retryable + Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !error.is_retryable() {
                warn!(attempt, error = %error, "Operation failed with non-retryable error");
                return Err(RetryError::Rejected(error));
            }

            if attempt > self.max_retries {
                warn!(attempts = attempt, error = %error, "Operation failed, retries exhausted");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = self.jittered_backoff(attempt);
            warn!(
                attempt,
                max_attempts = self.max_attempts(),
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Operation failed, backing off before retry"
            );

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!(attempt, "Retry wait cancelled");
                    return Err(RetryError::Cancelled);
                }

                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Error)]
    #[error("test failure (retryable: {retryable})")]
    struct TestError {
        retryable: bool,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    fn transient() -> TestError {
        TestError { retryable: true }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Delay schedule
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100));

        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(4), Duration::from_millis(800));
    }

    #[test]
    fn jitter_stays_within_ten_percent() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1000));

        for retry in 1..=4 {
            let base = policy.backoff(retry);
            let ceiling = base.mul_f64(1.0 + JITTER_FRACTION);
            for _ in 0..50 {
                let delay = policy.jittered_backoff(retry);
                assert!(delay >= base, "{:?} below base {:?}", delay, base);
                assert!(delay <= ceiling, "{:?} above ceiling {:?}", delay, ceiling);
            }
        }
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        let delay = policy.jittered_backoff(200);
        assert!(delay >= Duration::from_secs(1));
    }

    #[test]
    fn default_policy_matches_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(policy.base_delay, DEFAULT_BASE_DELAY);
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_RETRIES + 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Termination
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn always_failing_operation_makes_retries_plus_one_attempts() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<(), _> = policy
            .run(&cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        match result {
            Err(RetryError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 4);
                assert!(source.retryable);
            }
            other => panic!("expected exhausted, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_second_attempt_stops_immediately() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result = policy
            .run(&cancel, || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 2 {
                        Err(transient())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_never_waits() {
        let policy = RetryPolicy::new(3, Duration::from_secs(60));
        let cancel = CancellationToken::new();
        let started = tokio::time::Instant::now();

        let result: Result<&str, RetryError<TestError>> =
            policy.run(&cancel, || async { Ok("done") }).await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_is_not_retried() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<(), _> = policy
            .run(&cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError { retryable: false }) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(RetryError::Rejected(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_makes_a_single_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_millis(100));
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();

        let result: Result<(), _> = policy
            .run(&cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(RetryError::Exhausted { attempts: 1, .. })
        ));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cancellation
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_wait_returns_promptly() {
        let policy = RetryPolicy::new(3, Duration::from_secs(10));
        let calls = Arc::new(AtomicU32::new(0));
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        let counter = Arc::clone(&calls);
        let result: Result<(), _> = policy
            .run(&cancel, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_stops_after_first_failure() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let calls = AtomicU32::new(0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<(), _> = policy
            .run(&cancel, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;

        assert!(result.as_ref().unwrap_err().is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
