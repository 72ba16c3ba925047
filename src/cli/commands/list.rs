//! List and stats command implementations.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let kb = orchestrator.knowledge_base();

    let personas = kb.list_personas().await;
    if personas.is_empty() {
        Output::info("No personas yet. Use 'mimic create <name>' or 'mimic ingest <name> <url>'.");
        return Ok(());
    }

    Output::header(&format!("Personas ({})", personas.len()));
    println!();

    for persona in &personas {
        let stats = kb.stats(persona).await;
        Output::list_item(&format!("{} ({} chunks)", persona, stats.document_count));
    }

    Ok(())
}

/// Run the stats command.
pub async fn run_stats(persona: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let kb = orchestrator.knowledge_base();

    if !kb.exists(persona).await {
        Output::warning(&format!("No knowledge base found for '{}'", persona));
    }

    let stats = kb.stats(persona).await;
    Output::header(&stats.persona);
    Output::kv("Collection", &stats.collection_name);
    Output::kv("Chunks", &stats.document_count.to_string());

    match kb.record(persona) {
        Ok(Some(record)) => {
            Output::kv("Created", &record.created_at.format("%Y-%m-%d %H:%M").to_string());
            Output::kv("Updated", &record.updated_at.format("%Y-%m-%d %H:%M").to_string());
            Output::kv("Sources", &record.sources.len().to_string());
            for source in &record.sources {
                Output::list_item(source);
            }
        }
        Ok(None) => {}
        Err(e) => Output::warning(&format!("Could not read persona record: {}", e)),
    }

    Ok(())
}
