//! The generic retry loop.

use super::strategy::{BackoffStrategy, RetryDecision, Retryable};
use crate::context::{CallContext, ContextError};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Run `operation` until it succeeds, the retry budget is spent, or the
/// failure says to stop.
///
/// The operation is invoked at most `1 + strategy.max_retries()` times, one
/// attempt at a time. After each failure the error's [`RetryDecision`] picks
/// the wait:
///
/// - [`RetryDecision::Stop`] returns the failure immediately.
/// - [`RetryDecision::RetryAfter`] waits exactly the server-suggested delay.
/// - [`RetryDecision::Backoff`] waits `strategy.next_delay(attempt)`.
///
/// Waits race `ctx`. If the context stops mid-wait the loop ends with
/// `E::from(ContextError)` instead of the last operation failure. The operation
/// itself is expected to observe `ctx` while it runs.
///
/// # Examples
///
/// ```rust
/// use turborouter_core::context::{CallContext, ContextError};
/// use turborouter_core::retry::{with_retry, RetryPolicy, Retryable};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Transient;
///
/// impl std::fmt::Display for Transient {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("transient")
///     }
/// }
///
/// impl Retryable for Transient {}
///
/// impl From<ContextError> for Transient {
///     fn from(_: ContextError) -> Self {
///         Transient
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = RetryPolicy::builder()
///     .base_delay(Duration::from_millis(1))
///     .jitter_enabled(false)
///     .build();
/// let calls = AtomicU32::new(0);
///
/// let result = with_retry(&policy, &CallContext::new(), || async {
///     if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///         Err(Transient)
///     } else {
///         Ok("ok")
///     }
/// })
/// .await;
///
/// assert_eq!(result.ok(), Some("ok"));
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # }
/// ```
pub async fn with_retry<S, F, Fut, T, E>(
    strategy: &S,
    ctx: &CallContext,
    mut operation: F,
) -> Result<T, E>
where
    S: BackoffStrategy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + From<ContextError> + Display,
{
    let max_retries = strategy.max_retries();
    let mut attempt: u32 = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= max_retries {
            if max_retries > 0 {
                tracing::warn!(
                    attempts = attempt + 1,
                    error = %err,
                    "Retry budget exhausted"
                );
            }
            return Err(err);
        }

        let delay = match err.retry_decision() {
            RetryDecision::Stop => return Err(err),
            RetryDecision::RetryAfter(delay) if delay > Duration::ZERO => delay,
            RetryDecision::RetryAfter(_) | RetryDecision::Backoff => strategy.next_delay(attempt),
        };

        tracing::warn!(
            attempt = attempt + 1,
            max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Request failed, retrying"
        );

        if let Err(ctx_err) = ctx.sleep(delay).await {
            tracing::debug!(error = %ctx_err, "Retry wait interrupted");
            return Err(E::from(ctx_err));
        }

        attempt += 1;
    }
}
