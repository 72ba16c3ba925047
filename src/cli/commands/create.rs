//! Create command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::vector_store::collection_key;
use anyhow::Result;

/// Run the create command.
pub async fn run_create(persona: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let kb = orchestrator.knowledge_base();

    if kb.exists(persona).await {
        Output::warning(&format!(
            "A knowledge base for '{}' already exists ({}). Names differing only in case or spacing share one.",
            persona,
            collection_key(persona)
        ));
        return Ok(());
    }

    let record = kb.create(persona).await?;
    Output::success(&format!("Created persona '{}'", record.name));
    Output::info(&format!(
        "Add content with: mimic ingest \"{}\" <youtube-url>",
        record.name
    ));

    Ok(())
}
