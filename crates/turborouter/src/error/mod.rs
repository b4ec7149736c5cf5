//! Error types for the OpenRouter SDK
//!
//! Failures fall into a small taxonomy:
//!
//! - **validation** ([`Error::InvalidRequest`]): caller input rejected before any I/O
//! - **provider, network, and context** ([`Error::Api`]): a classified [`ApiError`]
//! - **decode** ([`Error::ResponseValidation`]): a success body that did not match
//!   the expected shape
//! - **configuration** ([`Error::InvalidUrl`], [`Error::MissingConfig`], ...)
//!
//! Only [`Error::Api`] values flagged retryable, and opaque [`Error::Other`]
//! failures, are ever retried.

mod classify;
mod structured;

pub use classify::{
    Classification, DEFAULT_RATE_LIMIT_WAIT, MODEL_OVERLOADED_WAIT, MODEL_UNAVAILABLE_WAIT,
    SERVICE_UNAVAILABLE_WAIT, classify,
};
pub use structured::{ApiError, CONTEXT_ERROR, NETWORK_ERROR};

use std::time::Duration;
use thiserror::Error;
use turborouter_core::context::ContextError;
use turborouter_core::retry::{RetryDecision, Retryable};

/// Result type alias for operations that can fail with an SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Fallback shown to end users for failures without a classified message.
pub const GENERIC_USER_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Main error type for the OpenRouter SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Classified failure from the API, the network, or the call context.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid request parameters, detected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A successful response body did not match the expected shape.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Request body serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// The classified API error, if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Check if this error is a retryable [`ApiError`].
    ///
    /// Unclassified errors report `false` here even though the retry executor
    /// still gives [`Error::Other`] a backoff retry.
    pub fn is_retryable(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_retryable)
    }

    /// Get the server-suggested retry delay, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        self.as_api_error().and_then(ApiError::retry_after)
    }

    /// Message suitable for end users.
    ///
    /// Classified errors return their own user message; anything else returns
    /// [`GENERIC_USER_MESSAGE`].
    pub fn user_message(&self) -> &str {
        match self {
            Error::Api(err) => err.user_message(),
            _ => GENERIC_USER_MESSAGE,
        }
    }
}

impl Retryable for Error {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            Error::Api(err) if !err.is_retryable() => RetryDecision::Stop,
            Error::Api(err) => match err.retry_after() {
                Some(delay) => RetryDecision::RetryAfter(delay),
                None => RetryDecision::Backoff,
            },
            Error::Other(_) => RetryDecision::Backoff,
            Error::InvalidRequest(_)
            | Error::ResponseValidation(_)
            | Error::Serialization(_)
            | Error::InvalidUrl(_)
            | Error::InvalidHeaderName(_)
            | Error::InvalidHeaderValue(_)
            | Error::MissingConfig(_)
            | Error::HttpClient(_) => RetryDecision::Stop,
        }
    }
}

impl From<ContextError> for Error {
    fn from(err: ContextError) -> Self {
        Error::Api(ApiError::context(err))
    }
}
