//! Request validation
//!
//! Requests are checked before any I/O. A failure is a plain
//! [`Error::InvalidRequest`]: it never reaches the classifier and never
//! consumes a retry attempt.
//!
//! # Examples
//!
//! ```rust
//! use turborouter::types::{ChatCompletionRequest, ChatMessage};
//! use turborouter::validation::validate_chat_request;
//!
//! let request = ChatCompletionRequest::builder()
//!     .model("openai/gpt-4o-mini")
//!     .messages(vec![ChatMessage::user("Hello")])
//!     .build()?;
//!
//! validate_chat_request(&request)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{Error, Result};
use crate::types::{ChatCompletionRequest, ChatMessage, ImageRequest};
use tracing::debug;

const MAX_MODEL_ID_LEN: usize = 1024;

/// Validate a chat completion request.
///
/// Checks, in order: model present, at least one message, every message has
/// a role and content, sampling parameters finite (temperature and top_p also
/// non-negative).
///
/// # Errors
///
/// Returns `Error::InvalidRequest` naming the first problem found.
pub fn validate_chat_request(request: &ChatCompletionRequest) -> Result<()> {
    debug!(
        model = %request.model,
        message_count = request.messages.len(),
        "Validating chat completion request"
    );

    if request.model.is_empty() {
        return Err(invalid("model is required"));
    }
    validate_messages(&request.messages)?;

    non_negative("temperature", request.temperature)?;
    non_negative("top_p", request.top_p)?;
    finite("frequency_penalty", request.frequency_penalty)?;
    finite("presence_penalty", request.presence_penalty)?;

    Ok(())
}

/// Validate an image generation request.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if the prompt or model is empty.
pub fn validate_image_request(request: &ImageRequest) -> Result<()> {
    debug!(model = %request.model, n = request.n, "Validating image request");

    if request.prompt.is_empty() {
        return Err(invalid("prompt is required"));
    }
    if request.model.is_empty() {
        return Err(invalid("model is required"));
    }
    // n is unsigned, so "n must be non-negative" holds by construction

    Ok(())
}

/// Validate a model id used in a lookup path.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if the id is empty, too long, or contains
/// characters that would change the request path.
pub fn validate_model_id(model_id: &str) -> Result<()> {
    if model_id.trim().is_empty() {
        return Err(invalid("model id is required"));
    }

    if model_id.len() > MAX_MODEL_ID_LEN {
        return Err(Error::InvalidRequest(format!(
            "model id exceeds maximum length of {} characters",
            MAX_MODEL_ID_LEN
        )));
    }

    if let Some(bad) = model_id
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '?' | '#' | '%'))
    {
        return Err(Error::InvalidRequest(format!(
            "invalid model id '{}': unexpected character {:?}",
            model_id, bad
        )));
    }

    Ok(())
}

fn validate_messages(messages: &[ChatMessage]) -> Result<()> {
    if messages.is_empty() {
        return Err(invalid("at least one message is required"));
    }

    for (i, message) in messages.iter().enumerate() {
        if message.role.is_empty() {
            return Err(Error::InvalidRequest(format!(
                "message {}: role is required",
                i
            )));
        }
        if message.content.is_empty() {
            return Err(Error::InvalidRequest(format!(
                "message {}: content is required",
                i
            )));
        }
    }

    Ok(())
}

fn non_negative(field: &str, value: Option<f32>) -> Result<()> {
    finite(field, value)?;
    match value {
        Some(v) if v < 0.0 => Err(Error::InvalidRequest(format!(
            "{} must be non-negative",
            field
        ))),
        _ => Ok(()),
    }
}

fn finite(field: &str, value: Option<f32>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() => Err(Error::InvalidRequest(format!(
            "{} must be a finite number",
            field
        ))),
        _ => Ok(()),
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidRequest(message.to_string())
}
