//! Per-persona handle over a vector store collection.

use super::{checked_collection_key, collection_key, IndexedVector, SearchResult, VectorStore};
use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{MimicError, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The vector index of one persona.
///
/// Writes return errors; reads (`search`, `count`, `exists`) log failures
/// and degrade to empty results.
#[derive(Clone)]
pub struct VectorIndex {
    persona: String,
    key: String,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    pub fn new(persona: &str, store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            persona: persona.to_string(),
            key: collection_key(persona),
            store,
            embedder,
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// The collection key this index is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Embed and store chunks. Returns the number added.
    ///
    /// Chunks accumulate across calls; nothing is deduplicated. All chunks
    /// are embedded before anything is written, so a failed embedding call
    /// leaves the collection untouched.
    #[instrument(skip(self, chunks), fields(persona = %self.persona, count = chunks.len()))]
    pub async fn add(&self, chunks: Vec<Chunk>) -> Result<usize> {
        checked_collection_key(&self.persona)?;

        if chunks.is_empty() {
            return Ok(0);
        }

        if let Some(foreign) = chunks.iter().find(|c| collection_key(&c.persona) != self.key) {
            return Err(MimicError::InvalidInput(format!(
                "Chunk for persona '{}' cannot be added to collection {}",
                foreign.persona, self.key
            )));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(MimicError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let vectors: Vec<IndexedVector> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedVector::new(chunk, embedding))
            .collect();

        let added = self.store.insert_batch(&self.key, &vectors).await?;
        info!("Added {} chunks to {}", added, self.key);
        Ok(added)
    }

    /// The `k` chunks closest to `query`, best first.
    #[instrument(skip(self, query), fields(persona = %self.persona))]
    pub async fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        if k == 0 {
            return Vec::new();
        }

        let query_embedding = match self.embedder.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Query embedding failed for {}: {}", self.key, e);
                return Vec::new();
            }
        };

        match self.store.search(&self.key, &query_embedding, k).await {
            Ok(results) => {
                debug!("{} results from {}", results.len(), self.key);
                results
            }
            Err(e) => {
                warn!("Search in {} failed: {}", self.key, e);
                Vec::new()
            }
        }
    }

    /// Number of stored chunks; 0 when absent or unreadable.
    pub async fn count(&self) -> usize {
        self.store.count(&self.key).await.unwrap_or_else(|e| {
            warn!("Counting {} failed: {}", self.key, e);
            0
        })
    }

    pub async fn exists(&self) -> bool {
        self.store.exists(&self.key).await.unwrap_or_else(|e| {
            warn!("Checking {} failed: {}", self.key, e);
            false
        })
    }

    /// Remove every stored chunk. Deleting an absent collection is not an error.
    pub async fn delete_collection(&self) -> Result<()> {
        self.store.drop_collection(&self.key).await?;
        Ok(())
    }
}
