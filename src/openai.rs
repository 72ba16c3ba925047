//! Client construction for OpenAI-compatible APIs.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for the API at `base_url` with the default timeout.
///
/// The API key is read from `OPENAI_API_KEY` when set; local servers such as
/// Ollama ignore it.
pub fn create_client(base_url: &str) -> Client<OpenAIConfig> {
    create_client_with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client with a custom timeout.
pub fn create_client_with_timeout(base_url: &str, timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default();

    let config = OpenAIConfig::new().with_api_base(base_url.trim_end_matches('/'));
    Client::with_config(config).with_http_client(http_client)
}
