//! Fetch command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Run the fetch command.
pub async fn run_fetch(input: &str, output: Option<String>, settings: Settings) -> Result<()> {
    if !Path::new(input).is_file() {
        if let Err(e) = preflight::check(Operation::FetchRemote, &settings) {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = orchestrator.fetch_transcript(input).await;
    spinner.finish_and_clear();

    let transcript = match transcript {
        Ok(t) => t,
        Err(e) => {
            Output::error(&format!("Failed to fetch transcript: {}", e));
            return Err(e.into());
        }
    };

    if transcript.text.is_empty() {
        Output::warning("The captions contained no text.");
    }

    let output = output.map(PathBuf::from);
    let path = orchestrator.save_transcript(&transcript, output.as_deref())?;

    Output::success(&format!("Saved transcript to {}", path.display()));
    Output::kv("Title", transcript.source_name());
    Output::kv("Language", &transcript.language);
    Output::kv("Words", &transcript.text.split_whitespace().count().to_string());

    Ok(())
}
