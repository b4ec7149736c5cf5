//! # TurboRouter SDK
//!
//! Resilient Rust client for the OpenRouter inference API:
//! - Chat completions, image generation, and the model catalogue
//! - Structured errors classified into retry decisions and user-facing messages
//! - Exponential backoff with jitter, honouring server-suggested delays
//! - Cancellation and deadlines through [`CallContext`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turborouter::{CallContext, ChatCompletionRequest, ChatMessage, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("sk-or-v1-...")?;
//!
//!     let request = ChatCompletionRequest::builder()
//!         .model("openai/gpt-4o-mini")
//!         .messages(vec![ChatMessage::user("Hello!")])
//!         .build()?;
//!
//!     match client.chat().create(&CallContext::new(), &request).await {
//!         Ok(response) => println!("{}", response.text().unwrap_or_default()),
//!         Err(err) => eprintln!("{}", err.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::time::Duration;

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, LogConfig};
pub use error::{ApiError, Error, Result};
pub use traits::{ChatCompletionClient, ImageGenerationClient};
pub use turborouter_core::context::{CallContext, ContextError};
pub use turborouter_core::retry::{RetryPolicy, RetryPolicyBuilder};
pub use types::*;

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod resources;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export key dependencies for convenience
pub use async_trait::async_trait;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use turborouter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiError, CallContext, ChatCompletionClient, Client, ClientConfig, Error,
        ImageGenerationClient, Result, RetryPolicy,
        types::{
            ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ImageRequest,
            ImageResponse, Model, Usage,
        },
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default per-attempt request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BASE_URL, "https://openrouter.ai/api/v1");
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
    }
}
