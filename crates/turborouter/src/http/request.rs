//! HTTP request builder

use super::Response;
use crate::config::LogConfig;
use crate::error::{ApiError, Error, Result};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;
use turborouter_core::context::CallContext;

/// Builder for a single HTTP exchange.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Duration,
    log: LogConfig,
    http_client: reqwest::Client,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(http_client: reqwest::Client, method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: crate::DEFAULT_TIMEOUT,
            log: LogConfig::default(),
            http_client,
        }
    }

    /// Try to set a header, returning an error if the name or value is invalid.
    ///
    /// # Errors
    /// Returns an error if the header name or value contains invalid characters.
    pub fn try_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key = key_str
            .parse::<HeaderName>()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value = value_str
            .parse::<HeaderValue>()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.headers.insert(key, value);
        Ok(self)
    }

    /// Merge a set of already-validated headers, overwriting same-named ones.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (key, value) in headers {
            self.headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `value` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        Ok(self.body(serde_json::to_vec(value)?))
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set which request and response logs are written.
    pub fn log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Perform one exchange and buffer the response.
    ///
    /// Any HTTP status is returned as `Ok`; status handling is left to
    /// [`Response::into_result`].
    ///
    /// # Errors
    ///
    /// - a network `ApiError` if the request could not be sent or the body
    ///   could not be read (including the per-request timeout)
    /// - a context `ApiError` if `ctx` is cancelled or expires first
    pub async fn send(self, ctx: &CallContext) -> Result<Response> {
        let metadata = RequestMetadata::new(self.method.as_str(), self.url.as_str())
            .with_body_size(self.body.as_ref().map_or(0, Vec::len));
        if self.log.request_log {
            metadata.log_request(&self.headers, self.body.as_deref());
        }

        let mut req = self
            .http_client
            .request(self.method, self.url.as_str())
            .timeout(self.timeout)
            .headers(self.headers);
        if let Some(body) = self.body {
            req = req.body(body);
        }

        let timer = RequestTimer::start();
        let exchange = async {
            let resp = req.send().await?;
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = resp.bytes().await?;
            Ok::<_, reqwest::Error>(Response::new(status, headers, body))
        };

        let response = match ctx.run(exchange).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(Error::Api(ApiError::network(e))),
            Err(ctx_err) => return Err(Error::Api(ApiError::context(ctx_err))),
        };

        if self.log.response_log {
            ResponseMetadata::new(response.status().as_u16(), timer.elapsed())
                .with_body_size(response.body().len())
                .log_response(&metadata, response.body());
        }

        Ok(response)
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the headers.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the timeout.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }
}
