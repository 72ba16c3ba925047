//! Vector store abstraction for Mimic.
//!
//! Vectors are grouped into collections, one per persona. A collection is
//! addressed only by its key, so every handle opened on the same key sees
//! the same data.

mod index;
mod memory;
mod sqlite;

pub use index::VectorIndex;
pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::chunking::Chunk;
use crate::error::{MimicError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by all persona collection keys.
pub const COLLECTION_PREFIX: &str = "persona_";

/// Derive the collection key for a persona name.
///
/// The mapping is lossy: names differing only in case or spacing
/// ("Alice", "alice", " ALICE ") share one collection.
pub fn collection_key(persona: &str) -> String {
    let normalized: String = persona
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}{}", COLLECTION_PREFIX, normalized)
}

/// Collection key for a persona about to be written.
///
/// Names that are blank after trimming would map to the bare prefix, which
/// `persona_name_from_key` cannot list, so they are rejected.
pub fn checked_collection_key(persona: &str) -> Result<String> {
    if persona.trim().is_empty() {
        return Err(MimicError::InvalidInput(
            "Persona name must not be blank".to_string(),
        ));
    }
    Ok(collection_key(persona))
}

/// Recover a display name from a collection key, or `None` for foreign keys.
pub fn persona_name_from_key(key: &str) -> Option<String> {
    key.strip_prefix(COLLECTION_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.replace('_', " "))
}

/// A chunk stored together with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedVector {
    /// Unique record ID.
    pub id: Uuid,
    /// The embedded chunk.
    pub chunk: Chunk,
    /// Embedding of `chunk.text`.
    pub embedding: Vec<f32>,
    /// When this record was written.
    pub indexed_at: DateTime<Utc>,
}

impl IndexedVector {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chunk,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Cosine distance to the query (lower is more similar).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Make sure an (empty) collection exists.
    async fn create_collection(&self, key: &str) -> Result<()>;

    /// Append vectors to a collection, creating it if needed.
    ///
    /// Either all vectors are written or none are.
    async fn insert_batch(&self, key: &str, vectors: &[IndexedVector]) -> Result<usize>;

    /// Return up to `limit` nearest vectors, ascending by distance, ties in
    /// insertion order. An absent collection yields no results.
    async fn search(&self, key: &str, query_embedding: &[f32], limit: usize)
        -> Result<Vec<SearchResult>>;

    /// Number of vectors in a collection; 0 when absent.
    async fn count(&self, key: &str) -> Result<usize>;

    /// Whether the collection exists.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remove a collection and everything in it. Returns `false` if it was absent.
    async fn drop_collection(&self, key: &str) -> Result<bool>;

    /// Keys of all collections, sorted.
    async fn list_collections(&self) -> Result<Vec<String>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Cosine distance, `1 - cosine_similarity`. Ranges over `[0, 2]`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Rank candidates (given in insertion order) by distance to the query.
pub(crate) fn rank_by_distance(
    query_embedding: &[f32],
    candidates: impl IntoIterator<Item = (Chunk, Vec<f32>)>,
    limit: usize,
) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = candidates
        .into_iter()
        .map(|(chunk, embedding)| SearchResult {
            score: cosine_distance(query_embedding, &embedding),
            chunk,
        })
        .collect();

    // sort_by is stable, so equal distances keep insertion order
    results.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}
