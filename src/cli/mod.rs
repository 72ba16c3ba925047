//! CLI module for Mimic.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Mimic - persona knowledge bases from video transcripts
///
/// Builds one searchable knowledge base per persona from YouTube captions
/// or local caption files, and answers questions in that persona's voice.
#[derive(Parser, Debug)]
#[command(name = "mimic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "MIMIC_CONFIG")]
    pub config: Option<String>,

    /// Keep all data (collections, personas, transcripts) under this directory
    #[arg(long, global = true, env = "MIMIC_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty persona knowledge base
    Create {
        /// Persona name
        persona: String,
    },

    /// Fetch captions and add them to a persona
    Ingest {
        /// Persona name
        persona: String,

        /// YouTube URL/ID, playlist URL, or local caption file (.srt, .json3)
        input: String,

        /// Treat input as a playlist/channel URL and ingest all videos
        #[arg(long)]
        playlist: bool,

        /// Maximum number of videos to ingest from a playlist
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Add a plain-text transcript file to a persona
    AddText {
        /// Persona name
        persona: String,

        /// Path to the text file
        file: String,

        /// Source name stored with the chunks (default: file name)
        #[arg(long)]
        source_name: Option<String>,
    },

    /// Download a transcript without indexing it
    Fetch {
        /// YouTube URL/ID or local caption file
        input: String,

        /// Output file (default: transcripts directory)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List personas
    List,

    /// Show statistics for a persona
    Stats {
        /// Persona name
        persona: String,
    },

    /// Delete a persona and its knowledge base
    Delete {
        /// Persona name
        persona: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Search a persona's knowledge base
    Search {
        /// Persona name
        persona: String,

        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short)]
        k: Option<usize>,
    },

    /// Print the context block that would be handed to the model
    Context {
        /// Persona name
        persona: String,

        /// Query
        query: String,

        /// Maximum number of context chunks
        #[arg(short)]
        k: Option<usize>,
    },

    /// Ask a persona a question
    Ask {
        /// Persona name
        persona: String,

        /// The question to ask
        question: String,

        /// Maximum number of context chunks
        #[arg(short)]
        k: Option<usize>,

        /// Model to use for response generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingest_playlist() {
        let cli = Cli::try_parse_from([
            "mimic",
            "ingest",
            "Ada Lovelace",
            "https://youtube.com/playlist?list=PL1",
            "--playlist",
            "--limit",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Ingest { persona, playlist, limit, .. } => {
                assert_eq!(persona, "Ada Lovelace");
                assert!(playlist);
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_k_and_verbosity() {
        let cli = Cli::try_parse_from(["mimic", "-vv", "search", "Ada", "engines", "-k", "7"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Search { k: Some(7), .. }));
    }
}
