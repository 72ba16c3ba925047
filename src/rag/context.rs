//! Context building for persona responses.

use super::{ContextChunk, CONTEXT_SEPARATOR, NO_CONTEXT};
use crate::vector_store::VectorIndex;

/// Builds context for queries against one persona's index.
pub struct ContextBuilder {
    index: VectorIndex,
    max_chunks: usize,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(index: VectorIndex) -> Self {
        Self {
            index,
            max_chunks: 5,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    pub fn persona(&self) -> &str {
        self.index.persona()
    }

    /// Ranked chunks for a query, best first. Empty when nothing matches or
    /// the collection is missing.
    pub async fn build(&self, query: &str) -> Vec<ContextChunk> {
        self.index
            .search(query, self.max_chunks)
            .await
            .into_iter()
            .map(ContextChunk::from)
            .collect()
    }
}

/// Render chunks as source-tagged blocks, or [`NO_CONTEXT`] when there are none.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    if chunks.is_empty() {
        return NO_CONTEXT.to_string();
    }

    chunks
        .iter()
        .map(|chunk| format!("[Source: {}]\n{}", chunk.source, chunk.content))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Format context chunks for display to the user.
pub fn format_context_for_display(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "[{}] {} #{} (distance: {:.3})",
                i + 1,
                chunk.source,
                chunk.chunk_index,
                chunk.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Retrieve and render context for `query` from a persona's index.
pub async fn get_context(index: &VectorIndex, query: &str, k: usize) -> String {
    let chunks = ContextBuilder::new(index.clone())
        .with_max_chunks(k)
        .build(query)
        .await;
    format_context_for_prompt(&chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::embedding::HashingEmbedder;
    use crate::vector_store::{MemoryVectorStore, VectorStore};
    use std::sync::Arc;

    fn context_chunk(source: &str, content: &str) -> ContextChunk {
        ContextChunk {
            source: source.to_string(),
            chunk_index: 0,
            content: content.to_string(),
            score: 0.1,
        }
    }

    #[test]
    fn test_format_context_for_prompt() {
        let rendered = format_context_for_prompt(&[
            context_chunk("talk-1", "First"),
            context_chunk("talk-2", "Second"),
        ]);
        assert_eq!(
            rendered,
            "[Source: talk-1]\nFirst\n\n---\n\n[Source: talk-2]\nSecond"
        );
    }

    #[test]
    fn test_empty_context_is_sentinel() {
        assert_eq!(format_context_for_prompt(&[]), NO_CONTEXT);
    }

    #[tokio::test]
    async fn test_missing_and_empty_collections_give_same_sentinel() {
        let store = Arc::new(MemoryVectorStore::new());
        let embedder = Arc::new(HashingEmbedder::new(64));

        let missing = VectorIndex::new("Nobody", store.clone(), embedder.clone());
        let missing_context = get_context(&missing, "anything", 5).await;

        store.create_collection("persona_empty").await.unwrap();
        let empty = VectorIndex::new("Empty", store, embedder);
        let empty_context = get_context(&empty, "anything", 5).await;

        assert_eq!(missing_context, NO_CONTEXT);
        assert_eq!(missing_context, empty_context);
    }

    #[tokio::test]
    async fn test_context_is_ranked_best_first() {
        let index = VectorIndex::new(
            "Grace",
            Arc::new(MemoryVectorStore::new()),
            Arc::new(HashingEmbedder::new(256)),
        );
        let chunk = |i: u32, source: &str, text: &str| Chunk {
            text: text.to_string(),
            source: source.to_string(),
            chunk_index: i,
            persona: "Grace".to_string(),
        };
        index
            .add(vec![
                chunk(0, "navy", "nanoseconds and lengths of wire"),
                chunk(1, "compilers", "the first compiler for cobol"),
            ])
            .await
            .unwrap();

        let context = get_context(&index, "the first compiler for cobol", 2).await;
        assert!(context.starts_with("[Source: compilers]\nthe first compiler for cobol"));
        assert!(context.contains("\n\n---\n\n[Source: navy]"));
    }
}
