#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the TurboRouter SDK.
//!
//! This crate holds the pieces of the client that know nothing about HTTP or
//! the OpenRouter wire format:
//!
//! - **Retry execution** via [`retry::with_retry`] and [`retry::RetryPolicy`]
//!   - Exponential backoff with ±10% jitter
//!   - Server-suggested delays through [`retry::RetryDecision::RetryAfter`]
//!   - Immediate stop for failures that retrying cannot fix
//! - **Cancellation and deadlines** via [`context::CallContext`]
//!
//! Error types opt in to the executor by implementing [`retry::Retryable`]
//! and `From<ContextError>`, so the loop never inspects concrete error types.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use turborouter_core::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let policy = RetryPolicy::builder()
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(100))
//!     .build();
//! let ctx = CallContext::with_timeout(Duration::from_secs(30));
//!
//! let value = with_retry(&policy, &ctx, || async { Ok::<_, ContextError>(42) }).await;
//! assert_eq!(value, Ok(42));
//! # }
//! ```

pub mod context;
pub mod retry;

impl retry::Retryable for context::ContextError {
    fn retry_decision(&self) -> retry::RetryDecision {
        retry::RetryDecision::Stop
    }
}

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use turborouter_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::context::{CallContext, ContextError};
    pub use crate::retry::{
        BackoffStrategy, RetryDecision, RetryPolicy, RetryPolicyBuilder, Retryable, with_retry,
    };
}
