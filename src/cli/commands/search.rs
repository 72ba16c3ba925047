//! Search and context command implementations.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::rag::{format_context_for_prompt, ContextBuilder};
use anyhow::Result;

fn context_builder(orchestrator: &Orchestrator, persona: &str, k: Option<usize>) -> ContextBuilder {
    let k = k.unwrap_or(orchestrator.settings().retrieval.top_k);
    ContextBuilder::new(orchestrator.knowledge_base().index(persona)).with_max_chunks(k)
}

/// Run the search command.
pub async fn run_search(persona: &str, query: &str, k: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    if !orchestrator.knowledge_base().exists(persona).await {
        Output::warning(&format!("No knowledge base found for '{}'", persona));
        return Ok(());
    }

    let spinner = Output::spinner("Searching...");
    let chunks = context_builder(&orchestrator, persona, k).build(query).await;
    spinner.finish_and_clear();

    if chunks.is_empty() {
        Output::warning("No results found matching your query.");
        return Ok(());
    }

    Output::success(&format!("Found {} results", chunks.len()));
    for (i, chunk) in chunks.iter().enumerate() {
        Output::search_result(i + 1, &chunk.source, chunk.chunk_index, chunk.score, &chunk.content);
    }

    Ok(())
}

/// Run the context command.
pub async fn run_context(persona: &str, query: &str, k: Option<usize>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings)?;
    let chunks = context_builder(&orchestrator, persona, k).build(query).await;

    println!("{}", format_context_for_prompt(&chunks));
    Ok(())
}
