//! Models API endpoint

use http::Method;
use tracing::{debug, warn};
use turborouter_core::context::CallContext;

use super::call_metrics;
use crate::{
    client::Client,
    error::Result,
    observability::RequestTimer,
    types::{Model, ModelsResponse},
    validation::validate_model_id,
};

/// Models API resource.
#[derive(Clone, Copy)]
pub struct Models<'a> {
    client: &'a Client,
}

impl<'a> Models<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List all available models.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn list(&self, ctx: &CallContext) -> Result<ModelsResponse> {
        self.fetch(ctx, "/models".to_string()).await
    }

    /// Get information about a specific model.
    ///
    /// The id is appended to the path as given, so ids containing a slash
    /// (`vendor/model`) address the nested route.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &CallContext, model_id: &str) -> Result<Model> {
        validate_model_id(model_id)?;
        self.fetch(ctx, format!("/models/{}", model_id)).await
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        ctx: &CallContext,
        endpoint: String,
    ) -> Result<T> {
        debug!(endpoint = %endpoint, "Fetching model data");
        let timer = RequestTimer::start();

        let result = self
            .client
            .send_json(ctx, Method::GET, &endpoint, None)
            .await;
        let elapsed = timer.elapsed();

        if self.client.log_config().metrics {
            call_metrics(&endpoint, &Method::GET, elapsed, &result).log();
        }
        if let Err(e) = &result {
            warn!(elapsed_ms = elapsed.as_millis(), error = %e, "Model lookup failed");
        }

        result
    }
}
