//! Retrieval for persona question answering.
//!
//! Turns a query into a ranked, source-attributed context block and hands
//! it to a generator.

pub mod context;
mod response;

pub use context::{format_context_for_display, format_context_for_prompt, get_context, ContextBuilder};
pub use response::{PersonaResponder, PersonaResponse};

use crate::vector_store::SearchResult;

/// Returned in place of context when retrieval finds nothing.
///
/// Callers must treat this as "no results", not as literal context.
pub const NO_CONTEXT: &str = "No relevant context found.";

/// Separator between rendered context blocks.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// A retrieved chunk ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextChunk {
    /// Source document name.
    pub source: String,
    /// Position within the source.
    pub chunk_index: u32,
    /// Text content.
    pub content: String,
    /// Distance to the query (lower is better).
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source: result.chunk.source,
            chunk_index: result.chunk.chunk_index,
            content: result.chunk.text,
            score: result.score,
        }
    }
}
