//! Retry policy and the retry loop.
//!
//! Each logical request moves through
//! `Pending(1) -> InFlight -> Succeeded | RetryWait(n + 1) | Terminal`.
//! The loop below keeps that state explicitly as `(attempt, correlation_id)`
//! inside the [`RequestDescriptor`], so stack depth does not grow with the
//! number of attempts.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::errors::ClassifiedError;
use crate::executor::RequestDescriptor;

/// Default number of attempts per logical request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for the linear backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// What to do after a failed attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryDecision {
    /// Sleep for `delay`, then run attempt `next_attempt`.
    Retry { next_attempt: u32, delay: Duration },
    /// Surface the error to the caller.
    Terminal,
}

/// Process-wide retry configuration. Immutable once built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt; values below 1 are raised to 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Wait before the attempt that follows `completed_attempt`.
    ///
    /// Linear: `base_delay * completed_attempt`.
    pub fn delay_after(&self, completed_attempt: u32) -> Duration {
        self.base_delay.saturating_mul(completed_attempt)
    }

    /// Decide what follows a failed attempt.
    pub fn decide(&self, error: &ClassifiedError, attempt: u32) -> RetryDecision {
        if error.retryable() && attempt < self.max_attempts {
            RetryDecision::Retry {
                next_attempt: attempt + 1,
                delay: self.delay_after(attempt),
            }
        } else {
            RetryDecision::Terminal
        }
    }

    /// Run `attempt_fn` until it succeeds or the policy gives up.
    ///
    /// Every error is stamped with the descriptor's correlation id before it
    /// is logged or returned. A terminal error is returned as classified,
    /// never wrapped.
    pub async fn run<T, F, Fut>(
        &self,
        descriptor: RequestDescriptor,
        mut attempt_fn: F,
    ) -> Result<T, ClassifiedError>
    where
        F: FnMut(RequestDescriptor) -> Fut,
        Fut: Future<Output = Result<T, ClassifiedError>>,
    {
        let mut descriptor = descriptor;

        loop {
            let failure = match attempt_fn(descriptor.clone()).await {
                Ok(value) => {
                    debug!(
                        correlation_id = %descriptor.correlation_id(),
                        endpoint = descriptor.endpoint().path(),
                        attempt = descriptor.attempt(),
                        "drug database request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => e.with_correlation_id(descriptor.correlation_id().clone()),
            };

            match self.decide(&failure, descriptor.attempt()) {
                RetryDecision::Retry {
                    next_attempt,
                    delay,
                } => {
                    warn!(
                        correlation_id = %descriptor.correlation_id(),
                        endpoint = descriptor.endpoint().path(),
                        attempt = descriptor.attempt(),
                        kind = failure.kind().code(),
                        delay_ms = delay.as_millis() as u64,
                        "attempt failed, retrying: {}",
                        failure
                    );
                    tokio::time::sleep(delay).await;
                    descriptor = descriptor.next_attempt();
                    debug_assert_eq!(descriptor.attempt(), next_attempt);
                }
                RetryDecision::Terminal => {
                    error!(
                        correlation_id = %descriptor.correlation_id(),
                        endpoint = descriptor.endpoint().path(),
                        attempt = descriptor.attempt(),
                        kind = failure.kind().code(),
                        severity = failure.severity().as_str(),
                        "drug database request failed: {}",
                        failure
                    );
                    return Err(failure);
                }
            }
        }
    }
}
