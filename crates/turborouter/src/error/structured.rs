//! Structured error carrying classification results for one failed call.

use super::classify::classify;
use crate::types::null_as_default;
use http::HeaderMap;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use turborouter_core::context::ContextError;

/// Error code and type used for transport failures.
pub const NETWORK_ERROR: &str = "network_error";

/// Error code and type used for cancellation and deadline expiry.
pub const CONTEXT_ERROR: &str = "context_error";

const NETWORK_USER_MESSAGE: &str =
    "Network error occurred. Please check your internet connection and try again.";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A failed OpenRouter call, classified.
///
/// Every `ApiError` carries a ready-to-display [`user_message`](Self::user_message)
/// and a retry verdict decided by [`classify`](super::classify()). Instances are
/// built in one of three ways:
///
/// - [`ApiError::from_response`] for HTTP responses with status ≥ 400
/// - [`ApiError::network`] for transport failures before any response arrived
/// - [`ApiError::context`] for cancellation and deadline expiry
///
/// The type is deliberately neither `Clone` nor `PartialEq`: each value stands
/// for one distinct failure.
#[derive(Debug)]
pub struct ApiError {
    status_code: u16,
    error_code: String,
    error_type: String,
    message: String,
    user_message: String,
    retryable: bool,
    retry_after: Option<Duration>,
    param: Option<String>,
    details: Option<serde_json::Value>,
    cause: Option<BoxError>,
}

impl ApiError {
    /// Build an error from a failed HTTP response.
    ///
    /// The body is decoded as an OpenRouter error envelope
    /// `{"error": {"code", "message", "type", "param", "details"}}`. When that
    /// fails or the envelope has no message, the raw body (or the canonical
    /// status reason for an empty body) becomes the message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use turborouter::error::ApiError;
    /// use http::HeaderMap;
    ///
    /// let body = br#"{"error":{"code":"invalid_request_error","message":"m","type":"invalid_request_error"}}"#;
    /// let err = ApiError::from_response(400, &HeaderMap::new(), body);
    ///
    /// assert_eq!(err.error_code(), "invalid_request_error");
    /// assert_eq!(err.message(), "m");
    /// assert!(!err.is_retryable());
    /// ```
    pub fn from_response(status: u16, headers: &HeaderMap, body: &[u8]) -> Self {
        let envelope = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error)
            .filter(|detail| !detail.message.is_empty());

        let (error_code, error_type, message, param, details) = match envelope {
            Some(detail) => (
                detail.code.map(ErrorCode::into_string).unwrap_or_default(),
                detail.error_type,
                detail.message,
                detail.param,
                detail.details,
            ),
            None => {
                let message = if body.is_empty() {
                    http::StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or_default()
                        .to_string()
                } else {
                    String::from_utf8_lossy(body).into_owned()
                };
                (String::new(), String::new(), message, None, None)
            }
        };

        let classification = classify(status, &error_code, &error_type, headers);

        Self {
            status_code: status,
            error_code,
            error_type,
            message,
            user_message: classification.user_message.to_string(),
            retryable: classification.retryable,
            retry_after: classification.retry_after,
            param,
            details,
            cause: None,
        }
    }

    /// Wrap a transport-level failure (connection refused, reset, TLS, timeout).
    ///
    /// Network errors are always retryable and report status 0.
    pub fn network(cause: impl Into<BoxError>) -> Self {
        let cause = cause.into();
        Self {
            status_code: 0,
            error_code: NETWORK_ERROR.to_string(),
            error_type: NETWORK_ERROR.to_string(),
            message: cause.to_string(),
            user_message: NETWORK_USER_MESSAGE.to_string(),
            retryable: true,
            retry_after: None,
            param: None,
            details: None,
            cause: Some(cause),
        }
    }

    /// Wrap a cancellation or deadline expiry.
    ///
    /// Only a deadline expiry is retryable; an explicit cancellation is final.
    pub fn context(err: ContextError) -> Self {
        let user_message = if err.is_deadline_exceeded() {
            "Request timed out. Please try again."
        } else {
            "Request was cancelled."
        };
        Self {
            status_code: 0,
            error_code: CONTEXT_ERROR.to_string(),
            error_type: CONTEXT_ERROR.to_string(),
            message: err.to_string(),
            user_message: user_message.to_string(),
            retryable: err.is_deadline_exceeded(),
            retry_after: None,
            param: None,
            details: None,
            cause: Some(Box::new(err)),
        }
    }

    /// HTTP status code, or 0 for network and context failures.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Provider error code (numeric codes are rendered as decimal strings).
    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    /// Provider error type.
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// Raw error message from the provider or the underlying failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message suitable for end users. Falls back to [`message`](Self::message)
    /// when no user message was assigned.
    pub fn user_message(&self) -> &str {
        if self.user_message.is_empty() {
            &self.message
        } else {
            &self.user_message
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Alias for [`is_retryable`](Self::is_retryable).
    pub fn is_temporary(&self) -> bool {
        self.retryable
    }

    /// Server-suggested wait before retrying, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// The request parameter the provider blamed, if reported.
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Free-form details from the error envelope, if present.
    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    /// Whether this error came from a transport failure.
    pub fn is_network_error(&self) -> bool {
        self.status_code == 0 && self.error_code == NETWORK_ERROR
    }

    /// Whether this error came from cancellation or deadline expiry.
    pub fn is_context_error(&self) -> bool {
        self.status_code == 0 && self.error_code == CONTEXT_ERROR
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OpenRouter API error (status: {}, code: {}): {}",
            self.status_code, self.error_code, self.message
        )?;
        if let Some(cause) = &self.cause {
            write!(f, " (original: {})", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

// Wire format of the failure envelope

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<ErrorCode>,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    error_type: String,
    #[serde(default)]
    param: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// OpenRouter sends numeric codes, other providers send strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorCode {
    Text(String),
    Number(serde_json::Number),
}

impl ErrorCode {
    fn into_string(self) -> String {
        match self {
            ErrorCode::Text(s) => s,
            ErrorCode::Number(n) => n.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as _;

    fn parse(status: u16, body: &str) -> ApiError {
        ApiError::from_response(status, &HeaderMap::new(), body.as_bytes())
    }

    #[test]
    fn test_envelope_populates_fields() {
        let err = parse(
            400,
            r#"{"error":{"code":"invalid_request_error","message":"m","type":"invalid_request_error"}}"#,
        );

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "invalid_request_error");
        assert_eq!(err.error_type(), "invalid_request_error");
        assert_eq!(err.message(), "m");
        assert!(!err.is_retryable());
        assert_eq!(
            err.user_message(),
            "Invalid request. Please check your input parameters."
        );
    }

    #[test]
    fn test_null_type_keeps_code() {
        let err = parse(
            400,
            r#"{"error":{"code":"model_not_found","message":"no such model","type":null,"param":null}}"#,
        );

        assert_eq!(err.error_code(), "model_not_found");
        assert_eq!(err.error_type(), "");
        assert_eq!(err.message(), "no such model");
        assert_eq!(err.param(), None);
        assert_eq!(
            err.user_message(),
            "The specified AI model was not found. Please check the model name."
        );
    }

    #[test]
    fn test_null_message_falls_back_to_body() {
        let body = r#"{"error":{"code":"x","message":null}}"#;
        let err = parse(400, body);
        assert_eq!(err.message(), body);
    }

    #[test]
    fn test_numeric_code_rendered_as_string() {
        let err = parse(
            402,
            r#"{"error":{"code":402,"message":"Insufficient credits"}}"#,
        );
        assert_eq!(err.error_code(), "402");
        assert_eq!(err.message(), "Insufficient credits");
    }

    #[test]
    fn test_param_and_details_kept() {
        let err = parse(
            400,
            r#"{"error":{"code":"bad","message":"nope","type":"t","param":"temperature","details":{"max":2}}}"#,
        );
        assert_eq!(err.param(), Some("temperature"));
        assert_eq!(err.details(), Some(&serde_json::json!({"max": 2})));
    }

    #[test]
    fn test_plain_text_body_fallback() {
        let err = parse(502, "Bad Gateway from upstream");
        assert_eq!(err.message(), "Bad Gateway from upstream");
        assert_eq!(err.error_code(), "");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_empty_message_falls_back_to_body() {
        let body = r#"{"error":{"code":"x","message":"","type":"model_overloaded"}}"#;
        let err = parse(500, body);

        assert_eq!(err.message(), body);
        // Envelope without a message is ignored entirely, type included
        assert_eq!(err.error_type(), "");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_empty_body_uses_status_reason() {
        let err = parse(503, "");
        assert_eq!(err.message(), "Service Unavailable");
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_rate_limit_retry_after_header() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, "12".parse().unwrap());

        let err = ApiError::from_response(
            429,
            &headers,
            br#"{"error":{"code":"rate_limited","message":"slow down"}}"#,
        );

        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_display_without_cause() {
        let err = parse(404, r#"{"error":{"code":"model_not_found","message":"no such model"}}"#);
        assert_eq!(
            err.to_string(),
            "OpenRouter API error (status: 404, code: model_not_found): no such model"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_network_error() {
        let err = ApiError::network(std::io::Error::other("connection refused"));

        assert_eq!(err.status_code(), 0);
        assert_eq!(err.error_code(), "network_error");
        assert_eq!(err.error_type(), "network_error");
        assert!(err.is_retryable());
        assert!(err.is_network_error());
        assert_eq!(
            err.user_message(),
            "Network error occurred. Please check your internet connection and try again."
        );
        assert_eq!(
            err.to_string(),
            "OpenRouter API error (status: 0, code: network_error): connection refused (original: connection refused)"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_context_deadline_is_retryable() {
        let err = ApiError::context(ContextError::DeadlineExceeded);
        assert!(err.is_retryable());
        assert!(err.is_context_error());
        assert_eq!(err.user_message(), "Request timed out. Please try again.");
    }

    #[test]
    fn test_context_cancel_is_final() {
        let err = ApiError::context(ContextError::Cancelled);
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "context_error");
        assert_eq!(err.user_message(), "Request was cancelled.");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("context canceled".to_string())
        );
    }

    #[test]
    fn test_user_message_falls_back_to_message() {
        let err = ApiError {
            status_code: 418,
            error_code: String::new(),
            error_type: String::new(),
            message: "teapot".to_string(),
            user_message: String::new(),
            retryable: false,
            retry_after: None,
            param: None,
            details: None,
            cause: None,
        };
        assert_eq!(err.user_message(), "teapot");
        assert!(!err.is_temporary());
    }
}
