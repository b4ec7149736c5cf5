//! Request and response types for the OpenRouter API

mod chat;
mod image;
mod model;
mod usage;

pub use chat::{
    ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse, ChatMessage,
    Choice, LogProbs,
};
pub use image::{ImageData, ImageRequest, ImageRequestBuilder, ImageResponse};
pub use model::{Model, ModelPermission, ModelsResponse};
pub use usage::Usage;

/// Deserialize a field, reading an explicit JSON `null` as the default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Convert a Unix timestamp in seconds. Zero means the field was absent.
pub(crate) fn timestamp(secs: i64) -> Option<chrono::DateTime<chrono::Utc>> {
    if secs == 0 {
        return None;
    }
    chrono::DateTime::from_timestamp(secs, 0)
}
