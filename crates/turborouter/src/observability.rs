//! Centralized observability utilities for structured logging and metrics
//!
//! Every HTTP exchange is logged through this layer. Logging never fails a
//! call: if a log record cannot be serialized, a one-line summary is emitted
//! instead.

use http::HeaderMap;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ImageRequest, ImageResponse};

/// Replacement for the `Authorization` header in request logs.
pub const REDACTED_AUTHORIZATION: &str = "Bearer [REDACTED]";

/// Longest prompt prefix written to image generation logs, in characters.
pub const MAX_LOGGED_PROMPT_CHARS: usize = 100;

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Full request URL
    pub url: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

#[derive(Serialize)]
struct RequestLog<'a> {
    method: &'a str,
    url: &'a str,
    headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<serde_json::Value>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log the request being sent, with the bearer token redacted.
    pub fn log_request(&self, headers: &HeaderMap, body: Option<&[u8]>) {
        let record = RequestLog {
            method: &self.method,
            url: &self.url,
            headers: redact_headers(headers),
            body: body.and_then(|b| serde_json::from_slice(b).ok()),
        };

        match serde_json::to_string(&record) {
            Ok(json) => debug!(
                method = %self.method,
                url = %self.url,
                body_size = self.body_size,
                request = %json,
                "Sending HTTP request"
            ),
            Err(_) => debug!(
                method = %self.method,
                url = %self.url,
                body_size = self.body_size,
                "Sending HTTP request"
            ),
        }
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Response body size in bytes (optional)
    pub body_size: Option<usize>,
    /// Time elapsed for the request
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            body_size: None,
            elapsed,
        }
    }

    /// Set the response body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log the received response
    pub fn log_response(&self, request: &RequestMetadata, body: &[u8]) {
        debug!(
            method = %request.method,
            url = %request.url,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            body = %String::from_utf8_lossy(body),
            "Received HTTP response"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Per-call metrics, emitted once per API operation.
#[derive(Debug, Clone, Serialize)]
pub struct CallMetrics {
    /// Endpoint path (e.g. "/chat/completions")
    pub endpoint: String,
    /// HTTP method
    pub method: String,
    /// Model, when the call names one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Wall time including retries
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Final HTTP status, 0 when no response arrived
    pub status_code: u16,
    /// Prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    /// Completion tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
    /// Total tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

impl CallMetrics {
    /// Metrics for a call without token accounting.
    pub fn new(
        endpoint: impl Into<String>,
        method: impl Into<String>,
        duration: Duration,
        status_code: u16,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            model: None,
            duration,
            status_code,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
        }
    }

    /// Attach the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attach token usage.
    pub fn with_usage(mut self, usage: &crate::types::Usage) -> Self {
        self.prompt_tokens = Some(usage.prompt_tokens);
        self.completion_tokens = Some(usage.completion_tokens);
        self.total_tokens = Some(usage.total_tokens);
        self
    }

    /// Emit the metrics record at `info`.
    pub fn log(&self) {
        match serde_json::to_string(self) {
            Ok(json) => info!(
                endpoint = %self.endpoint,
                method = %self.method,
                status = self.status_code,
                duration_ms = self.duration.as_millis(),
                metrics = %json,
                "API call metrics"
            ),
            Err(_) => info!(
                endpoint = %self.endpoint,
                status = self.status_code,
                "API call metrics"
            ),
        }
    }
}

/// Log a completed chat completion.
pub fn log_chat_completion(
    request: &ChatCompletionRequest,
    response: &ChatCompletionResponse,
    duration: Duration,
) {
    let finish_reason = response
        .choices
        .first()
        .and_then(|choice| choice.finish_reason.as_deref())
        .unwrap_or_default();

    info!(
        id = %response.id,
        model = %request.model,
        message_count = request.messages.len(),
        choice_count = response.choices.len(),
        finish_reason,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        total_tokens = response.usage.total_tokens,
        total_cost = response.usage.cost(),
        duration_ms = duration.as_millis(),
        "Chat completion finished"
    );
}

/// Log a completed image generation. Long prompts are truncated.
pub fn log_image_generation(request: &ImageRequest, response: &ImageResponse, duration: Duration) {
    info!(
        model = %request.model,
        prompt = %truncate_prompt(&request.prompt),
        image_count = response.data.len(),
        size = request.size.as_deref(),
        duration_ms = duration.as_millis(),
        "Image generation finished"
    );
}

/// Log the outcome of a connectivity check.
pub fn log_connection_test(duration: Duration, error: Option<&crate::Error>) {
    match error {
        None => info!(
            duration_ms = duration.as_millis(),
            "OpenRouter connection test succeeded"
        ),
        Some(err) => warn!(
            duration_ms = duration.as_millis(),
            error = %err,
            "OpenRouter connection test failed"
        ),
    }
}

/// Log a rate-limit response.
pub fn log_rate_limit_hit(url: &str, retry_after: Option<Duration>) {
    warn!(
        url = %url,
        retry_after_secs = retry_after.map(|d| d.as_secs()),
        "Rate limit hit"
    );
}

/// Initialize a `tracing` subscriber filtered by `RUST_LOG`, defaulting to `info`.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn redact_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if *name == http::header::AUTHORIZATION {
                REDACTED_AUTHORIZATION.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

fn truncate_prompt(prompt: &str) -> Cow<'_, str> {
    match prompt.char_indices().nth(MAX_LOGGED_PROMPT_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &prompt[..cut])),
        None => Cow::Borrowed(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_metadata_with_body_size() {
        let metadata = RequestMetadata::new("POST", "https://openrouter.ai/api/v1/chat/completions")
            .with_body_size(1024);
        assert_eq!(metadata.method, "POST");
        assert_eq!(metadata.body_size, Some(1024));
    }

    #[test]
    fn test_authorization_is_redacted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            "Bearer sk-or-v1-secret".parse().unwrap(),
        );
        headers.insert("x-title", "My App".parse().unwrap());

        let redacted = redact_headers(&headers);
        assert_eq!(redacted["authorization"], "Bearer [REDACTED]");
        assert_eq!(redacted["x-title"], "My App");
        assert!(!redacted.values().any(|v| v.contains("secret")));
    }

    #[test]
    fn test_prompt_truncation() {
        let short = "a cat";
        assert_eq!(truncate_prompt(short), "a cat");

        let long = "é".repeat(150);
        let truncated = truncate_prompt(&long);
        assert_eq!(truncated.chars().count(), MAX_LOGGED_PROMPT_CHARS + 3);
        assert!(truncated.ends_with("..."));

        let exact = "x".repeat(MAX_LOGGED_PROMPT_CHARS);
        assert_eq!(truncate_prompt(&exact), exact.as_str());
    }

    #[test]
    fn test_call_metrics_serialization() {
        let usage = crate::types::Usage {
            prompt_tokens: 3,
            completion_tokens: 4,
            total_tokens: 7,
            ..Default::default()
        };
        let metrics = CallMetrics::new("/chat/completions", "POST", Duration::from_millis(250), 200)
            .with_model("openai/gpt-4o-mini")
            .with_usage(&usage);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["duration"], 250);
        assert_eq!(json["total_tokens"], 7);
        assert_eq!(json["model"], "openai/gpt-4o-mini");

        let bare = serde_json::to_value(CallMetrics::new("/models", "GET", Duration::ZERO, 0)).unwrap();
        assert!(bare.get("model").is_none());
        assert!(bare.get("prompt_tokens").is_none());
    }

    #[test]
    fn test_request_timer() {
        let timer = RequestTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
    }
}
