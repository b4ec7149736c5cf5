//! Mapping from HTTP failures to retry decisions and user-facing messages.
//!
//! Retryability is decided here and nowhere else. Call sites construct an
//! [`ApiError`](super::ApiError), which runs [`classify`] once; the retry
//! executor only reads the result.

use http::HeaderMap;
use std::time::Duration;

/// Default wait after a 429 without a usable `Retry-After` header.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Fixed wait after a 503.
pub const SERVICE_UNAVAILABLE_WAIT: Duration = Duration::from_secs(30);

/// Wait after an upstream model reports it is overloaded.
pub const MODEL_OVERLOADED_WAIT: Duration = Duration::from_secs(30);

/// Wait after an upstream model reports it is unavailable.
pub const MODEL_UNAVAILABLE_WAIT: Duration = Duration::from_secs(60);

/// Outcome of classifying one failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Whether retrying the same request may succeed.
    pub retryable: bool,
    /// Message safe to show to an end user.
    pub user_message: &'static str,
    /// Server-suggested wait before the next attempt.
    ///
    /// Always `None` when `retryable` is false.
    pub retry_after: Option<Duration>,
}

impl Classification {
    fn new(retryable: bool, user_message: &'static str) -> Self {
        Self {
            retryable,
            user_message,
            retry_after: None,
        }
    }

    fn wait(mut self, delay: Duration) -> Self {
        self.retry_after = Some(delay);
        self
    }
}

/// Classify a failure by HTTP status, provider error code, and provider error type.
///
/// The status decides first. A recognised `error_type` (compared
/// case-insensitively) then overrides the status result entirely.
///
/// # Examples
///
/// ```rust
/// use turborouter::error::classify;
/// use http::HeaderMap;
/// use std::time::Duration;
///
/// let c = classify(503, "", "", &HeaderMap::new());
/// assert!(c.retryable);
/// assert_eq!(c.retry_after, Some(Duration::from_secs(30)));
///
/// // The error type wins over the status code.
/// let c = classify(429, "", "insufficient_quota", &HeaderMap::new());
/// assert!(!c.retryable);
/// assert_eq!(c.retry_after, None);
/// ```
pub fn classify(
    status: u16,
    error_code: &str,
    error_type: &str,
    headers: &HeaderMap,
) -> Classification {
    let code = error_code.to_lowercase();

    let by_status = match status {
        401 => Classification::new(
            false,
            "Authentication failed. Please check your OpenRouter API key.",
        ),
        403 => {
            if ["insufficient", "credit", "balance"]
                .iter()
                .any(|needle| code.contains(needle))
            {
                Classification::new(
                    false,
                    "Insufficient credits. Please add credits to your OpenRouter account.",
                )
            } else {
                Classification::new(false, "Access forbidden. Please check your API permissions.")
            }
        }
        404 => {
            if code.contains("model") {
                Classification::new(
                    false,
                    "The requested AI model is not available. Please try a different model.",
                )
            } else {
                Classification::new(false, "The requested resource was not found.")
            }
        }
        429 => Classification::new(
            true,
            "Rate limit exceeded. Please wait a moment before trying again.",
        )
        .wait(retry_after_header(headers).unwrap_or(DEFAULT_RATE_LIMIT_WAIT)),
        400 => {
            let message = match code.as_str() {
                "invalid_request_error" => "Invalid request. Please check your input parameters.",
                "model_not_found" => {
                    "The specified AI model was not found. Please check the model name."
                }
                "context_length_exceeded" => {
                    "Your message is too long. Please try with a shorter message."
                }
                _ => "Bad request. Please check your input and try again.",
            };
            Classification::new(false, message)
        }
        500 => Classification::new(
            true,
            "OpenRouter service is temporarily unavailable. Please try again in a few moments.",
        ),
        502 => Classification::new(
            true,
            "OpenRouter gateway error. Please try again in a few moments.",
        ),
        503 => Classification::new(
            true,
            "OpenRouter service is temporarily unavailable. Please try again later.",
        )
        .wait(SERVICE_UNAVAILABLE_WAIT),
        504 => Classification::new(true, "Request timed out. Please try again."),
        s if s >= 500 => {
            Classification::new(true, "OpenRouter service error. Please try again later.")
        }
        s if s >= 400 => Classification::new(
            false,
            "Request error. Please check your input and try again.",
        ),
        _ => Classification::new(false, "An unexpected error occurred."),
    };

    match error_type.to_lowercase().as_str() {
        // retry_after is cleared so a non-retryable result never carries a wait
        "insufficient_quota" => Classification::new(
            false,
            "Insufficient quota. Please check your OpenRouter account limits.",
        ),
        "model_overloaded" => Classification::new(
            true,
            "The AI model is currently overloaded. Please try again in a few moments.",
        )
        .wait(MODEL_OVERLOADED_WAIT),
        "model_unavailable" => Classification::new(
            true,
            "The AI model is temporarily unavailable. Please try a different model or wait a few moments.",
        )
        .wait(MODEL_UNAVAILABLE_WAIT),
        _ => by_status,
    }
}

/// Parse an integer-seconds `Retry-After` header. Zero, negative, and
/// non-numeric values count as absent.
fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(http::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .map(|secs| Duration::from_secs(secs.unsigned_abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn no_headers() -> HeaderMap {
        HeaderMap::new()
    }

    fn retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, value.parse().unwrap());
        headers
    }

    #[rstest]
    #[case(400)]
    #[case(401)]
    #[case(403)]
    #[case(404)]
    #[case(418)]
    fn test_client_errors_not_retryable(#[case] status: u16) {
        let c = classify(status, "", "", &no_headers());
        assert!(!c.retryable);
        assert_eq!(c.retry_after, None);
    }

    #[rstest]
    #[case(429)]
    #[case(500)]
    #[case(502)]
    #[case(503)]
    #[case(504)]
    #[case(599)]
    fn test_server_errors_retryable(#[case] status: u16) {
        assert!(classify(status, "", "", &no_headers()).retryable);
    }

    #[rstest]
    #[case(401, "", "Authentication failed. Please check your OpenRouter API key.")]
    #[case(403, "INSUFFICIENT_FUNDS", "Insufficient credits. Please add credits to your OpenRouter account.")]
    #[case(403, "low_balance", "Insufficient credits. Please add credits to your OpenRouter account.")]
    #[case(403, "no_credit", "Insufficient credits. Please add credits to your OpenRouter account.")]
    #[case(403, "forbidden", "Access forbidden. Please check your API permissions.")]
    #[case(404, "model_gone", "The requested AI model is not available. Please try a different model.")]
    #[case(404, "", "The requested resource was not found.")]
    #[case(400, "invalid_request_error", "Invalid request. Please check your input parameters.")]
    #[case(400, "Model_Not_Found", "The specified AI model was not found. Please check the model name.")]
    #[case(400, "context_length_exceeded", "Your message is too long. Please try with a shorter message.")]
    #[case(400, "other", "Bad request. Please check your input and try again.")]
    #[case(500, "", "OpenRouter service is temporarily unavailable. Please try again in a few moments.")]
    #[case(502, "", "OpenRouter gateway error. Please try again in a few moments.")]
    #[case(503, "", "OpenRouter service is temporarily unavailable. Please try again later.")]
    #[case(504, "", "Request timed out. Please try again.")]
    #[case(520, "", "OpenRouter service error. Please try again later.")]
    #[case(422, "", "Request error. Please check your input and try again.")]
    #[case(302, "", "An unexpected error occurred.")]
    fn test_user_messages(#[case] status: u16, #[case] code: &str, #[case] expected: &str) {
        assert_eq!(classify(status, code, "", &no_headers()).user_message, expected);
    }

    #[test]
    fn test_rate_limit_uses_retry_after_header() {
        let c = classify(429, "", "", &retry_after("60"));
        assert!(c.retryable);
        assert_eq!(c.retry_after, Some(Duration::from_secs(60)));

        let c = classify(429, "", "", &retry_after("7"));
        assert_eq!(c.retry_after, Some(Duration::from_secs(7)));
    }

    #[rstest]
    #[case("soon")]
    #[case("0")]
    #[case("-5")]
    #[case("Wed, 21 Oct 2015 07:28:00 GMT")]
    fn test_rate_limit_unusable_header_defaults(#[case] value: &str) {
        let c = classify(429, "", "", &retry_after(value));
        assert_eq!(c.retry_after, Some(DEFAULT_RATE_LIMIT_WAIT));
    }

    #[test]
    fn test_rate_limit_without_header_defaults() {
        let c = classify(429, "", "", &no_headers());
        assert_eq!(c.retry_after, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_service_unavailable_waits_thirty_seconds() {
        let c = classify(503, "", "", &retry_after("5"));
        assert_eq!(c.retry_after, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_model_unavailable_override() {
        let c = classify(404, "", "Model_Unavailable", &no_headers());
        assert!(c.retryable);
        assert_eq!(c.retry_after, Some(Duration::from_secs(60)));
        assert_eq!(
            c.user_message,
            "The AI model is temporarily unavailable. Please try a different model or wait a few moments."
        );
    }

    #[test]
    fn test_unknown_error_type_keeps_status_result() {
        let c = classify(500, "", "server_error", &no_headers());
        assert_eq!(c, classify(500, "", "", &no_headers()));
    }

    proptest! {
        #[test]
        fn prop_insufficient_quota_never_retryable(status in 0u16..1000) {
            let c = classify(status, "", "insufficient_quota", &retry_after("10"));
            prop_assert!(!c.retryable);
            prop_assert_eq!(c.retry_after, None);
            prop_assert_eq!(
                c.user_message,
                "Insufficient quota. Please check your OpenRouter account limits."
            );
        }

        #[test]
        fn prop_model_overloaded_always_waits_thirty_seconds(status in 0u16..1000) {
            let c = classify(status, "", "model_overloaded", &no_headers());
            prop_assert!(c.retryable);
            prop_assert_eq!(c.retry_after, Some(Duration::from_secs(30)));
        }

        #[test]
        fn prop_retry_after_implies_retryable(
            status in 0u16..1000,
            code in "[a-z_]{0,24}",
            kind in prop::sample::select(vec!["", "insufficient_quota", "model_overloaded", "model_unavailable", "other"]),
        ) {
            let c = classify(status, &code, kind, &no_headers());
            if c.retry_after.is_some() {
                prop_assert!(c.retryable);
            }
        }
    }
}
