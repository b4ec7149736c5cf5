//! Exponential backoff policy with optional jitter.

use super::executor::with_retry;
use super::strategy::{BackoffStrategy, Retryable};
use crate::context::{CallContext, ContextError};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Fraction of the computed delay used as the jitter range (±10%).
pub const JITTER_FRACTION: f64 = 0.1;

/// Retry configuration for outbound calls.
///
/// Delays grow as `base_delay * backoff_factor^attempt`, capped at
/// `max_delay`. With jitter enabled, each delay is perturbed uniformly by up to
/// ±10% of its value.
///
/// # Mathematical Formula
///
/// For attempt `n` (0-indexed after first failure):
/// ```text
/// raw_delay    = base_delay * (backoff_factor ^ n)
/// capped_delay = min(raw_delay, max_delay)
/// final_delay  = capped_delay + random(-0.1, +0.1) * capped_delay   (jitter on)
/// ```
///
/// # Examples
///
/// ```rust
/// use turborouter_core::retry::{BackoffStrategy, RetryPolicy};
/// use std::time::Duration;
///
/// // Defaults: max_retries=3, base=1s, max=30s, factor=2.0, jitter on
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_retries(), 3);
///
/// let policy = RetryPolicy::builder()
///     .max_retries(5)
///     .base_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(1))
///     .backoff_factor(2.0)
///     .jitter_enabled(false)
///     .build();
///
/// assert_eq!(policy.next_delay(3), Duration::from_millis(800));
/// assert_eq!(policy.next_delay(4), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_factor: f64,
    jitter_enabled: bool,
}

impl RetryPolicy {
    /// Default number of retries after the first attempt.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// Default initial backoff.
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
    /// Default backoff ceiling.
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);
    /// Default multiplicative growth per attempt.
    pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

    /// Create a new builder for configuring a policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A policy that runs the operation exactly once.
    pub fn no_retry() -> Self {
        Self::builder().max_retries(0).build()
    }

    /// A builder pre-filled with this policy's settings.
    pub fn to_builder(&self) -> RetryPolicyBuilder {
        RetryPolicyBuilder {
            max_retries: Some(self.max_retries),
            base_delay: Some(self.base_delay),
            max_delay: Some(self.max_delay),
            backoff_factor: Some(self.backoff_factor),
            jitter_enabled: Some(self.jitter_enabled),
        }
    }

    /// Initial backoff delay.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Backoff ceiling.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Multiplicative growth per attempt.
    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    /// Whether delays are randomized by ±10%.
    pub fn jitter_enabled(&self) -> bool {
        self.jitter_enabled
    }

    /// Run `operation` under this policy.
    ///
    /// Shorthand for [`with_retry(self, ctx, operation)`](with_retry).
    pub async fn execute<F, Fut, T, E>(&self, ctx: &CallContext, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + From<ContextError> + Display,
    {
        with_retry(self, ctx, operation).await
    }

    fn capped_delay_nanos(&self, attempt: u32) -> f64 {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base_delay.as_nanos() as f64 * self.backoff_factor.powi(exponent);
        let cap = self.max_delay.as_nanos() as f64;
        if raw.is_nan() { cap } else { raw.min(cap) }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            backoff_factor: Self::DEFAULT_BACKOFF_FACTOR,
            jitter_enabled: true,
        }
    }
}

impl BackoffStrategy for RetryPolicy {
    fn next_delay(&self, attempt: u32) -> Duration {
        let capped = self.capped_delay_nanos(attempt);

        let delay = if self.jitter_enabled {
            // random() is in [0, 1), mapped onto [-1, 1)
            let spread = rand::random::<f64>() * 2.0 - 1.0;
            capped + capped * JITTER_FRACTION * spread
        } else {
            capped
        };

        Duration::from_nanos(delay.max(0.0).round() as u64)
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for [`RetryPolicy`].
///
/// Unset fields fall back to the policy defaults.
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_retries: Option<u32>,
    base_delay: Option<Duration>,
    max_delay: Option<Duration>,
    backoff_factor: Option<f64>,
    jitter_enabled: Option<bool>,
}

impl RetryPolicyBuilder {
    /// Set the number of retries after the first attempt.
    ///
    /// Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the initial backoff delay.
    ///
    /// Default: 1s
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Set the backoff ceiling.
    ///
    /// Default: 30s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the multiplicative growth per attempt.
    ///
    /// Default: 2.0
    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = Some(factor);
        self
    }

    /// Enable or disable ±10% jitter.
    ///
    /// Default: enabled
    pub fn jitter_enabled(mut self, enabled: bool) -> Self {
        self.jitter_enabled = Some(enabled);
        self
    }

    /// Build the policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(RetryPolicy::DEFAULT_MAX_RETRIES),
            base_delay: self.base_delay.unwrap_or(RetryPolicy::DEFAULT_BASE_DELAY),
            max_delay: self.max_delay.unwrap_or(RetryPolicy::DEFAULT_MAX_DELAY),
            backoff_factor: self
                .backoff_factor
                .unwrap_or(RetryPolicy::DEFAULT_BACKOFF_FACTOR),
            jitter_enabled: self.jitter_enabled.unwrap_or(true),
        }
    }
}
