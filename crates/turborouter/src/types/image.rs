//! Image generation types

use base64::Engine;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::timestamp;
use crate::error::{Error, Result};

/// Request parameters for generating images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option))]
pub struct ImageRequest {
    /// Text prompt describing the image
    pub prompt: String,

    /// Model to use
    pub model: String,

    /// Number of images to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub n: Option<u32>,

    /// Image size (e.g. "1024x1024")
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub size: Option<String>,

    /// "url" or "b64_json"
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub response_format: Option<String>,

    /// End-user identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub user: Option<String>,

    /// Quality hint (e.g. "hd")
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub quality: Option<String>,

    /// Style hint (e.g. "vivid")
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub style: Option<String>,
}

impl ImageRequest {
    /// Create a builder for constructing an ImageRequest.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

/// Response from the image generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Unix timestamp of creation
    #[serde(default)]
    pub created: i64,

    /// Generated images
    #[serde(default)]
    pub data: Vec<ImageData>,
}

impl ImageResponse {
    /// Creation time as a UTC timestamp.
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp(self.created)
    }
}

/// One generated image, delivered by URL or inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    /// Hosted image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Inline base64-encoded image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    /// Prompt after provider-side rewriting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl ImageData {
    /// Decode the inline payload.
    ///
    /// Returns `Ok(None)` when the image was delivered by URL only.
    ///
    /// # Errors
    ///
    /// Returns `Error::ResponseValidation` if the payload is not valid base64.
    pub fn decode_b64(&self) -> Result<Option<Vec<u8>>> {
        self.b64_json
            .as_deref()
            .map(|encoded| {
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| Error::ResponseValidation(format!("invalid b64_json: {}", e)))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_builder() {
        let request = ImageRequest::builder()
            .prompt("a lighthouse at dusk")
            .model("openai/dall-e-3")
            .n(2u32)
            .size("1024x1024")
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"], "a lighthouse at dusk");
        assert_eq!(json["n"], 2);
        assert!(json.get("style").is_none());
    }

    #[test]
    fn test_decode_b64() {
        let image = ImageData {
            b64_json: Some("aGVsbG8=".to_string()),
            ..Default::default()
        };
        assert_eq!(image.decode_b64().unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_decode_b64_url_only() {
        let image = ImageData {
            url: Some("https://example.com/a.png".to_string()),
            ..Default::default()
        };
        assert_eq!(image.decode_b64().unwrap(), None);
    }

    #[test]
    fn test_decode_b64_invalid() {
        let image = ImageData {
            b64_json: Some("not base64!!".to_string()),
            ..Default::default()
        };
        assert_matches!(image.decode_b64(), Err(Error::ResponseValidation(_)));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"created": 1700000000, "data": [{"url": "https://x/1.png", "revised_prompt": "p"}]}"#;
        let response: ImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].revised_prompt.as_deref(), Some("p"));
        assert!(response.created_at().is_some());
    }
}
