//! Chat completion types

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::{Usage, null_as_default, timestamp};

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the sender ("system", "user", "assistant", ...)
    pub role: String,

    /// Text content of the message. Providers may send `null`, read as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,

    /// Optional participant name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    /// Create a message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            name: None,
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Attach a participant name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Request parameters for creating a chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct ChatCompletionRequest {
    /// Model to use (e.g. "openai/gpt-4o-mini")
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub top_p: Option<f32>,

    /// Frequency penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub frequency_penalty: Option<f32>,

    /// Presence penalty
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub presence_penalty: Option<f32>,

    /// Streaming flag. The client always sends complete requests, so this
    /// stays false unless a caller forwards it elsewhere.
    #[serde(default)]
    #[builder(default)]
    pub stream: bool,

    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub stop: Option<Vec<String>>,

    /// End-user identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub user: Option<String>,
}

impl ChatCompletionRequest {
    /// Create a builder for constructing a ChatCompletionRequest.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }
}

/// Response from the chat completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Unique identifier for the completion
    pub id: String,

    /// Object type (usually "chat.completion")
    #[serde(default)]
    pub object: String,

    /// Unix timestamp of creation
    #[serde(default)]
    pub created: i64,

    /// Model that produced the completion
    pub model: String,

    /// Generated choices, in order
    pub choices: Vec<Choice>,

    /// Token usage and cost
    #[serde(default)]
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
    }

    /// Creation time as a UTC timestamp.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(self.created)
    }
}

/// One generated alternative in a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    /// Position of this choice
    #[serde(default)]
    pub index: u32,

    /// Generated message
    pub message: ChatMessage,

    /// Why generation stopped ("stop", "length", ...)
    #[serde(default)]
    pub finish_reason: Option<String>,

    /// Token log probabilities, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<LogProbs>,
}

/// Per-token log probabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogProbs {
    /// Generated tokens
    #[serde(default)]
    pub tokens: Vec<String>,

    /// Log probability of each token
    #[serde(default)]
    pub token_logprobs: Vec<f32>,

    /// Most likely alternatives at each position
    #[serde(default)]
    pub top_logprobs: Vec<std::collections::HashMap<String, f32>>,

    /// Character offsets of each token
    #[serde(default)]
    pub text_offset: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");

        let named = ChatMessage::assistant("a").with_name("bot");
        assert_eq!(named.role, "assistant");
        assert_eq!(named.name.as_deref(), Some("bot"));
    }

    #[test]
    fn test_request_serialization_omits_unset_options() {
        let request = ChatCompletionRequest::builder()
            .model("openai/gpt-4o-mini")
            .messages(vec![ChatMessage::user("Hello")])
            .temperature(0.7f32)
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "openai/gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["stream"], false);
        assert!(json.get("temperature").is_some());
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("stop").is_none());
        assert!(json["messages"][0].get("name").is_none());
    }

    #[test]
    fn test_builder_requires_model() {
        let result = ChatCompletionRequest::builder()
            .messages(vec![ChatMessage::user("Hello")])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "gen-123",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "openai/gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hi there"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 3, "total_tokens": 8}
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Hi there"));
        assert_eq!(response.usage.total_tokens, 8);
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(
            response.created_at().map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_null_content_reads_as_empty() {
        let json = r#"{
            "id": "gen-456",
            "model": "openai/gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "length"}
            ]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some(""));
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("length"));
    }

    #[test]
    fn test_response_without_usage() {
        let json = r#"{"id":"gen-1","model":"m","choices":[]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), None);
        assert_eq!(response.usage.total_tokens, 0);
    }
}
