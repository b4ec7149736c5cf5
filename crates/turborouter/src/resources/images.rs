//! Image generation endpoint

use http::Method;
use tracing::{debug, warn};
use turborouter_core::context::CallContext;

use super::call_metrics;
use crate::{
    client::Client,
    error::Result,
    observability::{RequestTimer, log_image_generation},
    types::{ImageRequest, ImageResponse},
    validation::validate_image_request,
};

const ENDPOINT: &str = "/images/generations";

/// Image generation resource.
#[derive(Clone, Copy)]
pub struct Images<'a> {
    client: &'a Client,
}

impl<'a> Images<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Generate images from a prompt.
    #[tracing::instrument(skip(self, ctx, request), fields(model = %request.model, n = request.n))]
    pub async fn generate(&self, ctx: &CallContext, request: &ImageRequest) -> Result<ImageResponse> {
        if let Err(e) = validate_image_request(request) {
            warn!("Request validation failed: {}", e);
            return Err(e);
        }

        let body = serde_json::to_vec(request)?;
        debug!(body_size = body.len(), "Sending image generation request");
        let timer = RequestTimer::start();

        let result: Result<ImageResponse> = self
            .client
            .send_json(ctx, Method::POST, ENDPOINT, Some(body))
            .await;
        let elapsed = timer.elapsed();

        if self.client.log_config().metrics {
            if let Ok(response) = &result {
                log_image_generation(request, response, elapsed);
            }
            call_metrics(ENDPOINT, &Method::POST, elapsed, &result)
                .with_model(&request.model)
                .log();
        }
        if let Err(e) = &result {
            warn!(elapsed_ms = elapsed.as_millis(), error = %e, "Image generation failed");
        }

        result
    }
}
