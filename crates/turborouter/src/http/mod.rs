//! HTTP request and response plumbing
//!
//! One [`RequestBuilder::send`] is one attempt: it performs a single exchange
//! and maps transport and context failures onto [`ApiError`](crate::error::ApiError).
//! Retrying is the client's job.

pub use request::RequestBuilder;
pub use response::Response;

mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
