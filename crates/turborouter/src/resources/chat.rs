//! Chat completions endpoint

use http::Method;
use tracing::{debug, warn};
use turborouter_core::context::CallContext;

use super::call_metrics;
use crate::{
    client::Client,
    error::Result,
    observability::{RequestTimer, log_chat_completion},
    types::{ChatCompletionRequest, ChatCompletionResponse},
    validation::validate_chat_request,
};

const ENDPOINT: &str = "/chat/completions";

/// Chat completions resource.
#[derive(Clone, Copy)]
pub struct Chat<'a> {
    client: &'a Client,
}

impl<'a> Chat<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a chat completion.
    ///
    /// The request is validated before anything is sent; a validation failure
    /// is returned as `Error::InvalidRequest` and consumes no retry attempt.
    #[tracing::instrument(skip(self, ctx, request), fields(model = %request.model, message_count = request.messages.len()))]
    pub async fn create(
        &self,
        ctx: &CallContext,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        if let Err(e) = validate_chat_request(request) {
            warn!("Request validation failed: {}", e);
            return Err(e);
        }

        let body = serde_json::to_vec(request)?;
        debug!(body_size = body.len(), "Sending chat completion request");
        let timer = RequestTimer::start();

        let result: Result<ChatCompletionResponse> = self
            .client
            .send_json(ctx, Method::POST, ENDPOINT, Some(body))
            .await;
        let elapsed = timer.elapsed();

        if self.client.log_config().metrics {
            let mut metrics =
                call_metrics(ENDPOINT, &Method::POST, elapsed, &result).with_model(&request.model);
            if let Ok(response) = &result {
                metrics = metrics.with_usage(&response.usage);
                log_chat_completion(request, response, elapsed);
            }
            metrics.log();
        }
        if let Err(e) = &result {
            warn!(elapsed_ms = elapsed.as_millis(), error = %e, "Chat completion failed");
        }

        result
    }
}
