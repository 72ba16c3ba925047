//! Text chunking for breaking normalized transcripts into indexable spans.
//!
//! Chunks are fixed-size sliding windows measured in words or characters,
//! with a configurable overlap between neighbours.

mod window;

pub use window::{split_chars, split_words, validate_window};

use crate::config::ChunkingSettings;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A bounded span of source text, the unit of indexing and retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// Source document this chunk was cut from.
    pub source: String,
    /// Position within the source document, starting at 0.
    pub chunk_index: u32,
    /// Persona that owns this chunk.
    pub persona: String,
}

/// Unit the chunking window is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkUnit {
    /// Whitespace-delimited words.
    Words,
    /// Unicode characters.
    #[default]
    Characters,
}

impl std::str::FromStr for ChunkUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "words" | "word" | "tokens" => Ok(ChunkUnit::Words),
            "characters" | "chars" | "char" => Ok(ChunkUnit::Characters),
            _ => Err(format!("Unknown chunk unit: {}", s)),
        }
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub unit: ChunkUnit,
    pub window_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self::from(&ChunkingSettings::default())
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            unit: settings.unit,
            window_size: settings.window_size,
            overlap: settings.overlap,
        }
    }
}

/// Splits text into windows and tags them with source and persona.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkingConfig,
}

impl TextChunker {
    /// Create a chunker, rejecting invalid window parameters.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        validate_window(config.window_size, config.overlap)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `text` into raw window strings.
    pub fn split(&self, text: &str) -> Result<Vec<String>> {
        let ChunkingConfig { unit, window_size, overlap } = self.config;
        match unit {
            ChunkUnit::Words => split_words(text, window_size, overlap),
            ChunkUnit::Characters => split_chars(text, window_size, overlap),
        }
    }

    /// Split `text` into chunks numbered from 0 within `source`.
    pub fn chunk(&self, text: &str, source: &str, persona: &str) -> Result<Vec<Chunk>> {
        let chunks = self
            .split(text)?
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk {
                text,
                source: source.to_string(),
                chunk_index: i as u32,
                persona: persona.to_string(),
            })
            .collect();

        Ok(chunks)
    }
}
