//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{MimicError, Result};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingesting from YouTube needs yt-dlp and the embedding endpoint.
    IngestRemote,
    /// Ingesting local files or text only needs the embedding endpoint.
    IngestLocal,
    /// Fetching a YouTube transcript needs yt-dlp.
    FetchRemote,
    /// Searching embeds the query.
    Search,
    /// Asking embeds the query and calls the generation endpoint.
    Ask,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    let embedding_key = || {
        if settings.embedding.provider.eq_ignore_ascii_case("hashing") {
            Ok(())
        } else {
            check_api_key(&settings.embedding.base_url)
        }
    };

    match operation {
        Operation::IngestRemote => {
            check_tool("yt-dlp")?;
            embedding_key()?;
        }
        Operation::IngestLocal | Operation::Search => {
            embedding_key()?;
        }
        Operation::FetchRemote => {
            check_tool("yt-dlp")?;
        }
        Operation::Ask => {
            embedding_key()?;
            check_api_key(&settings.generation.base_url)?;
        }
    }
    Ok(())
}

/// Hosted OpenAI needs a key; local OpenAI-compatible servers do not.
fn requires_api_key(base_url: &str) -> bool {
    url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.ends_with("openai.com")))
        .unwrap_or(false)
}

/// Check if an API key is configured when the endpoint needs one.
fn check_api_key(base_url: &str) -> Result<()> {
    if !requires_api_key(base_url) {
        return Ok(());
    }
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(MimicError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(MimicError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(MimicError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MimicError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(MimicError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
