//! Configuration for the OpenRouter client

use http::HeaderMap;
use secrecy::SecretString;
use std::time::Duration;
use turborouter_core::retry::RetryPolicy;

use crate::DEFAULT_TIMEOUT;

/// Configuration for the OpenRouter client.
///
/// Nothing here is global: every client owns the configuration it was built
/// from, including its retry policy and logging switches.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key for authentication
    pub api_key: Option<SecretString>,

    /// Base URL for the API. `None` means [`DEFAULT_BASE_URL`](crate::DEFAULT_BASE_URL).
    pub base_url: Option<String>,

    /// Per-attempt request timeout
    pub timeout: Duration,

    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    pub site_url: Option<String>,

    /// Sent as `X-Title` for OpenRouter app attribution
    pub site_name: Option<String>,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,

    /// Connection pool configuration
    pub connection_pool: ConnectionPoolConfig,

    /// Retry policy. `None` means [`RetryPolicy::default()`].
    pub retry_policy: Option<RetryPolicy>,

    /// Logging switches
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            site_url: None,
            site_name: None,
            default_headers: HeaderMap::new(),
            connection_pool: ConnectionPoolConfig::default(),
            retry_policy: None,
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Then this looks for:
    /// - `OPENROUTER_API_KEY` for authentication
    /// - `OPENROUTER_BASE_URL` for the API base URL
    /// - `OPENROUTER_TIMEOUT` for the request timeout (in seconds)
    /// - `OPENROUTER_MAX_RETRIES` for the retry budget
    /// - `OPENROUTER_SITE_URL` and `OPENROUTER_SITE_NAME` for attribution headers
    ///
    /// Unparseable numbers are ignored and the default is kept.
    #[cfg(feature = "env")]
    pub fn from_env() -> crate::Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(api_key) = env::var("OPENROUTER_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }

        if let Ok(base_url) = env::var("OPENROUTER_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Ok(timeout_str) = env::var("OPENROUTER_TIMEOUT")
            && let Ok(timeout_secs) = timeout_str.trim().parse::<u64>()
        {
            config.timeout = Duration::from_secs(timeout_secs);
        }

        if let Ok(max_retries_str) = env::var("OPENROUTER_MAX_RETRIES")
            && let Ok(max_retries) = max_retries_str.trim().parse::<u32>()
        {
            config.retry_policy = Some(RetryPolicy::builder().max_retries(max_retries).build());
        }

        if let Ok(site_url) = env::var("OPENROUTER_SITE_URL") {
            config.site_url = Some(site_url);
        }

        if let Ok(site_name) = env::var("OPENROUTER_SITE_NAME") {
            config.site_name = Some(site_name);
        }

        Ok(config)
    }

    /// Merge this configuration with another, with the other taking precedence.
    ///
    /// Unset values in `other` (and a default timeout) never override.
    pub fn merge(mut self, other: ClientConfig) -> Self {
        if other.api_key.is_some() {
            self.api_key = other.api_key;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.timeout != DEFAULT_TIMEOUT {
            self.timeout = other.timeout;
        }
        if other.site_url.is_some() {
            self.site_url = other.site_url;
        }
        if other.site_name.is_some() {
            self.site_name = other.site_name;
        }
        for (key, value) in other.default_headers.iter() {
            self.default_headers.insert(key.clone(), value.clone());
        }
        if other.retry_policy.is_some() {
            self.retry_policy = other.retry_policy;
        }
        if other.log != LogConfig::default() {
            self.log = other.log;
        }

        self
    }

    /// The retry policy the client will run under.
    pub fn effective_retry_policy(&self) -> RetryPolicy {
        self.retry_policy.clone().unwrap_or_default()
    }
}

/// Configuration for HTTP connection pooling.
#[derive(Debug, Clone)]
pub struct ConnectionPoolConfig {
    /// Maximum number of idle connections per host
    pub max_idle_per_host: usize,

    /// Idle connection timeout
    pub idle_timeout: Duration,

    /// TCP keep-alive interval
    pub tcp_keepalive: Option<Duration>,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Some(Duration::from_secs(60)),
        }
    }
}

/// Logging switches.
///
/// All three are on by default. Request and response logs go out at `debug`,
/// metrics at `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Log outgoing requests (auth redacted)
    pub request_log: bool,

    /// Log received responses
    pub response_log: bool,

    /// Log per-call metrics (duration, status, tokens)
    pub metrics: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            request_log: true,
            response_log: true,
            metrics: true,
        }
    }
}

impl LogConfig {
    /// Everything off.
    pub fn disabled() -> Self {
        Self {
            request_log: false,
            response_log: false,
            metrics: false,
        }
    }
}

/// Builder for creating ClientConfig with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
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

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid according to HTTP specifications.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> crate::Result<Self> {
        let (key, value) = parse_header(key.into(), value.into())?;
        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Set the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry_policy = Some(policy);
        self
    }

    /// Set the logging switches.
    pub fn log(mut self, log: LogConfig) -> Self {
        self.config.log = log;
        self
    }

    /// Set connection pool configuration.
    pub fn connection_pool(mut self, config: ConnectionPoolConfig) -> Self {
        self.config.connection_pool = config;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

pub(crate) fn parse_header(
    key: String,
    value: String,
) -> crate::Result<(http::HeaderName, http::HeaderValue)> {
    let name: http::HeaderName = key
        .parse()
        .map_err(|_| crate::Error::InvalidHeaderName(key.clone()))?;
    let value: http::HeaderValue = value
        .parse()
        .map_err(|_| crate::Error::InvalidHeaderValue(value.clone()))?;
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use turborouter_core::retry::BackoffStrategy;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.api_key.is_none());
        assert!(config.retry_policy.is_none());
        assert_eq!(config.effective_retry_policy(), RetryPolicy::default());
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfigBuilder::new()
            .api_key("sk-or-v1-test")
            .base_url("https://example.com")
            .timeout(Duration::from_secs(10))
            .site_url("https://myapp.example")
            .site_name("My App")
            .retry_policy(RetryPolicy::no_retry())
            .log(LogConfig::disabled())
            .build();

        assert!(config.api_key.is_some());
        assert_eq!(config.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.site_name.as_deref(), Some("My App"));
        assert_eq!(config.effective_retry_policy().max_retries(), 0);
        assert!(!config.log.metrics);
    }

    #[test]
    fn test_default_header_rejects_invalid_name() {
        let result = ClientConfigBuilder::new().default_header("bad header", "v");
        assert_matches!(result, Err(crate::Error::InvalidHeaderName(name)) if name == "bad header");
    }

    #[test]
    fn test_config_merge() {
        let base = ClientConfigBuilder::new()
            .api_key("key1")
            .site_name("First")
            .default_header("x-custom", "value1")
            .unwrap()
            .build();
        let overlay = ClientConfigBuilder::new()
            .base_url("https://example.com")
            .timeout(Duration::from_secs(5))
            .default_header("x-other", "value2")
            .unwrap()
            .retry_policy(RetryPolicy::no_retry())
            .build();

        let merged = base.merge(overlay);
        assert!(merged.api_key.is_some());
        assert_eq!(merged.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(merged.timeout, Duration::from_secs(5));
        assert_eq!(merged.site_name.as_deref(), Some("First"));
        assert!(merged.default_headers.contains_key("x-custom"));
        assert!(merged.default_headers.contains_key("x-other"));
        assert_eq!(merged.retry_policy, Some(RetryPolicy::no_retry()));
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_variables() {
        temp_env::with_vars(
            [
                ("OPENROUTER_API_KEY", Some("sk-or-v1-env")),
                ("OPENROUTER_BASE_URL", Some("https://env-base.example/api/v1")),
                ("OPENROUTER_TIMEOUT", Some("120")),
                ("OPENROUTER_MAX_RETRIES", Some("5")),
                ("OPENROUTER_SITE_URL", Some("https://site.example")),
                ("OPENROUTER_SITE_NAME", Some("Env App")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert!(config.api_key.is_some());
                assert_eq!(
                    config.base_url.as_deref(),
                    Some("https://env-base.example/api/v1")
                );
                assert_eq!(config.timeout, Duration::from_secs(120));
                assert_eq!(config.effective_retry_policy().max_retries(), 5);
                assert_eq!(config.site_url.as_deref(), Some("https://site.example"));
                assert_eq!(config.site_name.as_deref(), Some("Env App"));
            },
        );
    }

    #[cfg(feature = "env")]
    #[test]
    fn test_config_from_env_ignores_bad_numbers() {
        temp_env::with_vars(
            [
                ("OPENROUTER_TIMEOUT", Some("soon")),
                ("OPENROUTER_MAX_RETRIES", Some("-1")),
            ],
            || {
                let config = ClientConfig::from_env().unwrap();
                assert_eq!(config.timeout, Duration::from_secs(30));
                assert!(config.retry_policy.is_none());
            },
        );
    }
}
