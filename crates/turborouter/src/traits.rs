//! Collaborator traits
//!
//! Code that only needs to create completions or images can depend on these
//! traits instead of [`Client`], and be tested against a mock.

use async_trait::async_trait;
use turborouter_core::context::CallContext;

use crate::{
    client::Client,
    error::Result,
    types::{ChatCompletionRequest, ChatCompletionResponse, ImageRequest, ImageResponse},
};

/// Anything that can create chat completions.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Create a chat completion.
    async fn create_chat_completion(
        &self,
        ctx: &CallContext,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}

/// Anything that can generate images.
#[async_trait]
pub trait ImageGenerationClient: Send + Sync {
    /// Generate images.
    async fn create_image(&self, ctx: &CallContext, request: &ImageRequest)
    -> Result<ImageResponse>;
}

#[async_trait]
impl ChatCompletionClient for Client {
    async fn create_chat_completion(
        &self,
        ctx: &CallContext,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.chat().create(ctx, request).await
    }
}

#[async_trait]
impl ImageGenerationClient for Client {
    async fn create_image(
        &self,
        ctx: &CallContext,
        request: &ImageRequest,
    ) -> Result<ImageResponse> {
        self.images().generate(ctx, request).await
    }
}
