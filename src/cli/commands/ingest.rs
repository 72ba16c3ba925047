//! Ingest and add-text command implementations.

use crate::captions::YtDlpCaptionSource;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::path::Path;

/// Run the ingest command.
pub async fn run_ingest(
    persona: &str,
    input: &str,
    playlist: bool,
    limit: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let remote = !Path::new(input).is_file();
    let operation = if remote {
        Operation::IngestRemote
    } else {
        Operation::IngestLocal
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    warn_on_name_collision(&orchestrator, persona);

    if playlist || (remote && YtDlpCaptionSource::is_collection_url(input)) {
        return run_ingest_playlist(&orchestrator, persona, input, limit).await;
    }

    Output::info(&format!("Processing: {}", input));
    let spinner = Output::spinner("Fetching captions and indexing...");
    let result = orchestrator.ingest(persona, input).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) if result.chunks_indexed == 0 => {
            Output::warning(&format!(
                "No usable caption text in '{}'; nothing was indexed.",
                result.source
            ));
        }
        Ok(result) => {
            Output::success(&format!(
                "Indexed '{}' into {} ({} chunks)",
                result.source, persona, result.chunks_indexed
            ));
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

async fn run_ingest_playlist(
    orchestrator: &Orchestrator,
    persona: &str,
    url: &str,
    limit: Option<usize>,
) -> Result<()> {
    Output::info(&format!("Fetching playlist: {}", url));
    let spinner = Output::spinner("Ingesting playlist videos...");
    let report = orchestrator.ingest_playlist(persona, url, limit).await;
    spinner.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            Output::error(&format!("Failed to read playlist: {}", e));
            return Err(e.into());
        }
    };

    for result in &report.ingested {
        Output::list_item(&format!("{} ({} chunks)", result.source, result.chunks_indexed));
    }
    for failure in &report.failed {
        Output::warning(&failure.to_string());
    }

    Output::success(&format!(
        "Playlist complete: {} videos, {} chunks indexed, {} failed",
        report.ingested.len(),
        report.chunks_indexed(),
        report.failed.len()
    ));

    Ok(())
}

/// Run the add-text command.
pub async fn run_add_text(
    persona: &str,
    file: &str,
    source_name: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::IngestLocal, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    warn_on_name_collision(&orchestrator, persona);

    match orchestrator
        .ingest_file(persona, Path::new(file), source_name.as_deref())
        .await
    {
        Ok(result) => {
            Output::success(&format!(
                "Added {} chunks from '{}' to {}",
                result.chunks_indexed, result.source, persona
            ));
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Warn when the persona's record was created under a differently spelled name.
fn warn_on_name_collision(orchestrator: &Orchestrator, persona: &str) {
    if let Ok(Some(record)) = orchestrator.knowledge_base().record(persona) {
        if record.name != persona.trim() {
            Output::warning(&format!(
                "'{}' shares a knowledge base with existing persona '{}'",
                persona, record.name
            ));
        }
    }
}
