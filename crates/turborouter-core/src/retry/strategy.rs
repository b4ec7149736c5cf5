//! Traits connecting failures and backoff schedules to the retry executor.

use std::time::Duration;

/// What the retry executor should do after an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the strategy's computed backoff delay.
    Backoff,
    /// Retry after exactly this long, skipping the backoff computation.
    ///
    /// A zero duration is treated as [`RetryDecision::Backoff`].
    RetryAfter(Duration),
    /// Give up immediately and return the failure.
    Stop,
}

/// Errors that know whether they are worth retrying.
///
/// The default implementation retries with backoff, so error types without a
/// classification of their own are retried until the budget runs out.
///
/// # Examples
///
/// ```rust
/// use turborouter_core::retry::{RetryDecision, Retryable};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Throttled(u64),
///     NotFound,
///     Flaky,
/// }
///
/// impl Retryable for FetchError {
///     fn retry_decision(&self) -> RetryDecision {
///         match self {
///             FetchError::Throttled(secs) => RetryDecision::RetryAfter(Duration::from_secs(*secs)),
///             FetchError::NotFound => RetryDecision::Stop,
///             FetchError::Flaky => RetryDecision::Backoff,
///         }
///     }
/// }
///
/// assert_eq!(FetchError::NotFound.retry_decision(), RetryDecision::Stop);
/// ```
pub trait Retryable {
    /// Classify this failure.
    fn retry_decision(&self) -> RetryDecision {
        RetryDecision::Backoff
    }
}

/// A schedule of delays between retry attempts.
///
/// Implementations decide how long to wait after a failure and how many
/// retries are allowed. [`RetryPolicy`](super::RetryPolicy) is the standard
/// exponential implementation.
pub trait BackoffStrategy: Send + Sync {
    /// Delay to wait after the failure of attempt `attempt` (0-indexed).
    ///
    /// `next_delay(0)` is the wait between the first call and the first retry.
    fn next_delay(&self, attempt: u32) -> Duration;

    /// Number of retries allowed after the first attempt.
    ///
    /// With `max_retries() == 3` an operation runs at most 4 times.
    fn max_retries(&self) -> u32;
}
