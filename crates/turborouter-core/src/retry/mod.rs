//! Retry execution and backoff policies.
//!
//! [`with_retry`] runs a fallible async operation repeatedly, asking each
//! failure for a [`RetryDecision`] through the [`Retryable`] trait and asking a
//! [`BackoffStrategy`] how long to wait between attempts. All waits race a
//! [`CallContext`](crate::context::CallContext).
//!
//! # Key Types
//!
//! - [`RetryPolicy`] - Exponential backoff with ±10% jitter
//! - [`BackoffStrategy`] - Delay schedule consumed by the executor
//! - [`Retryable`] - Failure classification consumed by the executor
//!
//! # Examples
//!
//! ```rust
//! use turborouter_core::context::{CallContext, ContextError};
//! use turborouter_core::retry::{RetryDecision, RetryPolicy, Retryable};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct NotFound;
//!
//! impl std::fmt::Display for NotFound {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("not found")
//!     }
//! }
//!
//! impl Retryable for NotFound {
//!     fn retry_decision(&self) -> RetryDecision {
//!         RetryDecision::Stop
//!     }
//! }
//!
//! impl From<ContextError> for NotFound {
//!     fn from(_: ContextError) -> Self {
//!         NotFound
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let policy = RetryPolicy::builder()
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(100))
//!     .build();
//!
//! let result: Result<(), NotFound> = policy
//!     .execute(&CallContext::new(), || async { Err(NotFound) })
//!     .await;
//! assert!(result.is_err());
//! # }
//! ```

mod executor;
mod policy;
mod strategy;

pub use executor::with_retry;
pub use policy::{JITTER_FRACTION, RetryPolicy, RetryPolicyBuilder};
pub use strategy::{BackoffStrategy, RetryDecision, Retryable};
