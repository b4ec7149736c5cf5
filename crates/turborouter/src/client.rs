//! Main client implementation for the OpenRouter API

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, HeaderValue, Method, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use turborouter_core::context::{CallContext, ContextError};
use turborouter_core::retry::{RetryPolicy, Retryable, with_retry};

use crate::{
    DEFAULT_BASE_URL,
    config::{ClientConfig, ConnectionPoolConfig, LogConfig, parse_header},
    error::{Error, Result},
    http::{RequestBuilder, Response},
    observability::{RequestTimer, log_connection_test, log_rate_limit_hit},
    resources::{Chat, Images, Models},
};

/// Prefix of OpenRouter API keys. Keys without it are accepted with a warning.
pub const API_KEY_PREFIX: &str = "sk-or-v1-";

/// Client for the OpenRouter inference API.
///
/// Every operation validates its input, then runs each HTTP attempt under the
/// client's [`RetryPolicy`]. Failures come back as [`Error`], with provider,
/// network, and context failures classified into an
/// [`ApiError`](crate::error::ApiError).
///
/// Cloning is cheap; clones share one connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use turborouter::{CallContext, ChatCompletionRequest, ChatMessage, Client};
/// use std::time::Duration;
///
/// # async fn example() -> turborouter::Result<()> {
/// let client = Client::new("sk-or-v1-...")?;
/// let ctx = CallContext::with_timeout(Duration::from_secs(60));
///
/// let request = ChatCompletionRequest::builder()
///     .model("openai/gpt-4o-mini")
///     .messages(vec![ChatMessage::user("Hello")])
///     .build()
///     .map_err(|e| turborouter::Error::InvalidRequest(e.to_string()))?;
///
/// let response = client.chat().create(&ctx, &request).await?;
/// println!("{}", response.text().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    /// Authorization, Content-Type, attribution, then caller defaults
    headers: HeaderMap,
    timeout: Duration,
    retry_policy: RetryPolicy,
    log: LogConfig,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .field("retry_policy", &self.inner.retry_policy)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with an API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or not a valid header value, or if
    /// the HTTP client cannot be initialized.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from `OPENROUTER_*` environment variables.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// - `Error::MissingConfig` if no API key is set
    /// - `Error::InvalidUrl` if the base URL is empty, unparseable, or not http/https
    /// - `Error::InvalidHeaderValue` if the key or site info cannot be sent as headers
    /// - `Error::HttpClient` if the HTTP client cannot be built
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let retry_policy = config.effective_retry_policy();

        let api_key = config
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::MissingConfig("OpenRouter API key".to_string()))?;
        if !api_key.starts_with(API_KEY_PREFIX) {
            warn!(
                expected_prefix = API_KEY_PREFIX,
                "API key does not look like an OpenRouter key"
            );
        }

        let base_url = validate_base_url(config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let headers = default_headers(api_key, &config)?;
        let http_client = build_http_client(&config.connection_pool)?;

        debug!(
            base_url = %base_url,
            timeout_ms = config.timeout.as_millis(),
            "OpenRouter client initialized"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                headers,
                timeout: config.timeout,
                retry_policy,
                log: config.log,
            }),
        })
    }

    /// Access the chat completions endpoint.
    pub fn chat(&self) -> Chat<'_> {
        Chat::new(self)
    }

    /// Access the image generation endpoint.
    pub fn images(&self) -> Images<'_> {
        Images::new(self)
    }

    /// Access the model catalogue.
    pub fn models(&self) -> Models<'_> {
        Models::new(self)
    }

    /// Check connectivity and credentials with a single `GET /models`.
    ///
    /// The response body is ignored. No retries are attempted.
    pub async fn ping(&self, ctx: &CallContext) -> Result<()> {
        let timer = RequestTimer::start();
        let result = self
            .request(Method::GET, "/models", None)
            .send(ctx)
            .await
            .and_then(Response::error_for_status)
            .map(|_| ());
        if self.inner.log.metrics {
            log_connection_test(timer.elapsed(), result.as_ref().err());
        }
        result
    }

    /// Run a caller-supplied operation under a retry policy.
    ///
    /// `None` uses the client's policy. Each invocation of `operation` is one
    /// attempt.
    pub async fn with_retry<F, Fut, T, E>(
        &self,
        ctx: &CallContext,
        policy: Option<&RetryPolicy>,
        operation: F,
    ) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Retryable + From<ContextError> + Display,
    {
        let policy = policy.unwrap_or(&self.inner.retry_policy);
        with_retry(policy, ctx, operation).await
    }

    /// The base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The retry policy used for API calls.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry_policy
    }

    pub(crate) fn log_config(&self) -> LogConfig {
        self.inner.log
    }

    /// Build one attempt's request. URL is the base URL plus `endpoint`.
    pub(crate) fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, endpoint);
        let request = RequestBuilder::new(self.inner.http_client.clone(), method, url)
            .headers(&self.inner.headers)
            .timeout(self.inner.timeout)
            .log_config(self.inner.log);
        match body {
            Some(body) => request.body(body),
            None => request,
        }
    }

    /// Send a JSON request under the client's retry policy and decode the reply.
    ///
    /// The body is serialized once; every attempt resends the same bytes.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        with_retry(&self.inner.retry_policy, ctx, || {
            let request = self.request(method.clone(), endpoint, body.clone());
            async move {
                let url = request.url().to_string();
                let result = request.send(ctx).await?.into_result::<T>();
                if let Err(Error::Api(api)) = &result
                    && api.status_code() == 429
                {
                    log_rate_limit_hit(&url, api.retry_after());
                }
                result
            }
        })
        .await
    }
}

/// Builder for creating a configured Client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of retries, keeping the rest of the retry policy.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.retry_policy = Some(
            self.config
                .effective_retry_policy()
                .to_builder()
                .max_retries(max_retries)
                .build(),
        );
        self
    }

    /// Replace the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = Some(policy);
        self
    }

    /// Set the site URL sent as `HTTP-Referer`.
    pub fn site_url(mut self, site_url: impl Into<String>) -> Self {
        self.config.site_url = Some(site_url.into());
        self
    }

    /// Set the site name sent as `X-Title`.
    pub fn site_name(mut self, site_name: impl Into<String>) -> Self {
        self.config.site_name = Some(site_name.into());
        self
    }

    /// Add a custom default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let (key, value) = parse_header(key.into(), value.into())?;
        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Set the logging switches.
    pub fn log_config(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Set connection pool configuration.
    pub fn connection_pool(mut self, pool: ConnectionPoolConfig) -> Self {
        self.config.connection_pool = pool;
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}

fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("base URL is empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(Error::InvalidUrl(format!(
            "unsupported scheme '{}' in {}; expected http or https",
            other, trimmed
        ))),
    }
}

fn default_headers(api_key: &str, config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|_| Error::InvalidHeaderValue("Authorization".to_string()))?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let attribution = [
        ("HTTP-Referer", config.site_url.as_deref()),
        ("X-Title", config.site_name.as_deref()),
    ];
    for (name, value) in attribution {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let (name, value) = parse_header(name.to_string(), value.to_string())?;
            headers.insert(name, value);
        }
    }

    for (name, value) in &config.default_headers {
        headers.insert(name.clone(), value.clone());
    }

    Ok(headers)
}

fn build_http_client(pool: &ConnectionPoolConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(pool.max_idle_per_host)
        .pool_idle_timeout(pool.idle_timeout)
        .tcp_keepalive(pool.tcp_keepalive)
        .build()
        .map_err(|e| Error::HttpClient(e.to_string()))
}
