//! Delete command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use console::{style, Term};

/// Run the delete command.
pub async fn run_delete(persona: &str, yes: bool, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let kb = orchestrator.knowledge_base();

    if !yes && !confirm(&format!("Delete '{}' and all of its indexed content?", persona))? {
        Output::info("Cancelled.");
        return Ok(());
    }

    match kb.delete(persona).await {
        Ok(true) => Output::success(&format!("Deleted '{}'", persona)),
        Ok(false) => Output::warning(&format!("No knowledge base found for '{}'", persona)),
        Err(e) => {
            Output::error(&format!("Failed to delete '{}': {}", persona, e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{} {} [y/N] ", style("??").yellow().bold(), question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
