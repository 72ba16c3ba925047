//! Mimic CLI entry point.

use anyhow::Result;
use clap::Parser;
use mimic::cli::{commands, Cli, Commands};
use mimic::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("mimic={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut settings = Settings::load_from(config_path.as_ref())?;
    if let Some(root) = &cli.data_dir {
        settings = settings.with_data_root(&Settings::expand_path(root));
    }

    // Execute command
    match &cli.command {
        Commands::Create { persona } => {
            commands::run_create(persona, settings).await?;
        }

        Commands::Ingest {
            persona,
            input,
            playlist,
            limit,
        } => {
            commands::run_ingest(persona, input, *playlist, *limit, settings).await?;
        }

        Commands::AddText {
            persona,
            file,
            source_name,
        } => {
            commands::run_add_text(persona, file, source_name.clone(), settings).await?;
        }

        Commands::Fetch { input, output } => {
            commands::run_fetch(input, output.clone(), settings).await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Stats { persona } => {
            commands::run_stats(persona, settings).await?;
        }

        Commands::Delete { persona, yes } => {
            commands::run_delete(persona, *yes, settings).await?;
        }

        Commands::Search { persona, query, k } => {
            commands::run_search(persona, query, *k, settings).await?;
        }

        Commands::Context { persona, query, k } => {
            commands::run_context(persona, query, *k, settings).await?;
        }

        Commands::Ask {
            persona,
            question,
            k,
            model,
        } => {
            commands::run_ask(persona, question, *k, model.clone(), settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
