//! API resource endpoints
//!
//! Each resource borrows the [`Client`](crate::Client) it was obtained from. Operations
//! validate first, then send under the client's retry policy.

pub mod chat;
pub mod images;
pub mod models;

pub use chat::Chat;
pub use images::Images;
pub use models::Models;

use std::time::Duration;

use crate::error::{Error, Result};
use crate::observability::CallMetrics;

/// Metrics for a finished call. Success is recorded as 200; failures carry
/// the classified status (0 when no response arrived).
pub(crate) fn call_metrics<T>(
    endpoint: &str,
    method: &http::Method,
    elapsed: Duration,
    result: &Result<T>,
) -> CallMetrics {
    let status = match result {
        Ok(_) => 200,
        Err(Error::Api(api)) => api.status_code(),
        Err(_) => 0,
    };
    CallMetrics::new(endpoint, method.as_str(), elapsed, status)
}
