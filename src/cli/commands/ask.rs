//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::generation::{Generator, OpenAIGenerator};
use crate::orchestrator::Orchestrator;
use crate::rag::{ContextBuilder, PersonaResponder};
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    persona: &str,
    question: &str,
    k: Option<usize>,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings.clone())?;
    let kb = orchestrator.knowledge_base();

    if !kb.exists(persona).await {
        Output::warning(&format!(
            "No knowledge base found for '{}'; answering without context.",
            persona
        ));
    }

    let mut generator = OpenAIGenerator::new(&settings.generation);
    if let Some(model) = model.as_deref() {
        generator = generator.with_model(model);
    }
    let generator: Arc<dyn Generator> = Arc::new(generator);

    let context_builder = ContextBuilder::new(kb.index(persona))
        .with_max_chunks(k.unwrap_or(settings.retrieval.top_k));
    let responder = PersonaResponder::new(context_builder, generator.clone());

    let spinner = Output::spinner(&format!("Asking {} ({})...", persona, generator.model()));

    match responder.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for (i, source) in response.sources.iter().enumerate() {
                    Output::search_result(
                        i + 1,
                        &source.source,
                        source.chunk_index,
                        source.score,
                        &source.content,
                    );
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
