//! Send one chat completion using `OPENROUTER_*` configuration.
//!
//! ```sh
//! OPENROUTER_API_KEY=sk-or-v1-... RUST_LOG=turborouter=debug \
//!     cargo run -p turborouter --example chat --features full -- "What is Rust?"
//! ```

use std::time::Duration;
use turborouter::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    turborouter::observability::init_tracing();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in five words.".to_string());

    let client = Client::from_env()?;
    let ctx = CallContext::with_timeout(Duration::from_secs(120));

    client.ping(&ctx).await?;

    let request = ChatCompletionRequest::builder()
        .model("openai/gpt-4o-mini")
        .messages(vec![
            ChatMessage::system("You are a concise assistant."),
            ChatMessage::user(prompt),
        ])
        .max_tokens(256u32)
        .build()?;

    match client.chat().create(&ctx, &request).await {
        Ok(response) => {
            println!("{}", response.text().unwrap_or_default());
            println!(
                "-- {} tokens, cost {:?}",
                response.usage.total_tokens,
                response.usage.cost()
            );
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            if let Some(api) = err.as_api_error() {
                eprintln!(
                    "status={} code={} retryable={}",
                    api.status_code(),
                    api.error_code(),
                    api.is_retryable()
                );
            }
        }
    }

    Ok(())
}
