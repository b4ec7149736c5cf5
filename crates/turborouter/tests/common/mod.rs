//! Common test utilities and helpers

use std::path::Path;
use std::time::Duration;
use turborouter::{Client, RetryPolicy};

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test API key
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "sk-or-v1-test-0123456789abcdef0123456789abcdef0123456789abcdef".to_string()
}

/// Retry policy with millisecond backoff so retry tests stay fast.
#[allow(dead_code)]
pub fn fast_retry_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(1))
        .max_delay(Duration::from_millis(10))
        .jitter_enabled(false)
        .build()
}

/// Client pointed at a mock server.
#[allow(dead_code)]
pub fn test_client(base_url: &str, max_retries: u32) -> Client {
    Client::builder()
        .api_key(test_api_key())
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .retry_policy(fast_retry_policy(max_retries))
        .build()
        .expect("Failed to build client")
}
