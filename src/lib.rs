//! Mimic - persona knowledge bases from spoken-word transcripts
//!
//! A local-first CLI tool that turns video captions into one searchable
//! knowledge base per persona and answers questions in that persona's voice.
//!
//! # Overview
//!
//! Mimic allows you to:
//! - Fetch YouTube captions (single videos or playlists) or read local caption files
//! - Chunk and embed transcripts into an isolated index per persona
//! - Search a persona's index and render source-attributed context
//! - Ask questions answered by a local or hosted chat model
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `captions` - Caption sources and normalization to plain text
//! - `chunking` - Overlapping fixed-size text windows
//! - `embedding` - Embedding generation
//! - `vector_store` - Per-persona vector collections
//! - `knowledge_base` - Persona registry (create, list, delete, stats)
//! - `rag` - Context assembly and persona responses
//! - `generation` - Chat model backends
//! - `orchestrator` - Ingestion pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use mimic::config::Settings;
//! use mimic::orchestrator::Orchestrator;
//! use mimic::rag::get_context;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator.ingest("Ada Lovelace", "dQw4w9WgXcQ").await?;
//!     println!("Indexed {} chunks", result.chunks_indexed);
//!
//!     let index = orchestrator.knowledge_base().index("Ada Lovelace");
//!     println!("{}", get_context(&index, "analytical engine", 5).await);
//!
//!     Ok(())
//! }
//! ```

pub mod captions;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod knowledge_base;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;

pub use error::{MimicError, Result};
