//! In-memory vector store implementation.
//!
//! Useful for testing and throwaway sessions; nothing survives the process.

use super::{rank_by_distance, IndexedVector, SearchResult, VectorStore};
use crate::error::{MimicError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Collections = BTreeMap<String, Vec<IndexedVector>>;

/// In-memory vector store.
pub struct MemoryVectorStore {
    collections: RwLock<Collections>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|e| MimicError::Storage(format!("Failed to acquire lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|e| MimicError::Storage(format!("Failed to acquire lock: {}", e)))
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn create_collection(&self, key: &str) -> Result<()> {
        self.write()?.entry(key.to_string()).or_default();
        Ok(())
    }

    async fn insert_batch(&self, key: &str, vectors: &[IndexedVector]) -> Result<usize> {
        self.write()?
            .entry(key.to_string())
            .or_default()
            .extend(vectors.iter().cloned());
        Ok(vectors.len())
    }

    async fn search(
        &self,
        key: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.read()?;
        let Some(vectors) = collections.get(key) else {
            return Ok(Vec::new());
        };

        Ok(rank_by_distance(
            query_embedding,
            vectors.iter().map(|v| (v.chunk.clone(), v.embedding.clone())),
            limit,
        ))
    }

    async fn count(&self, key: &str) -> Result<usize> {
        Ok(self.read()?.get(key).map_or(0, Vec::len))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read()?.contains_key(key))
    }

    async fn drop_collection(&self, key: &str) -> Result<bool> {
        Ok(self.write()?.remove(key).is_some())
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;

    fn vector(text: &str, index: u32, embedding: Vec<f32>) -> IndexedVector {
        IndexedVector::new(
            Chunk {
                text: text.to_string(),
                source: "notes".to_string(),
                chunk_index: index,
                persona: "bob".to_string(),
            },
            embedding,
        )
    }

    #[tokio::test]
    async fn test_memory_vector_store() {
        let store = MemoryVectorStore::new();

        store
            .insert_batch(
                "persona_bob",
                &[
                    vector("Hello world", 0, vec![1.0, 0.0, 0.0]),
                    vector("Goodbye world", 1, vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        assert_eq!(store.count("persona_bob").await.unwrap(), 2);
        assert_eq!(store.count("persona_other").await.unwrap(), 0);

        let results = store.search("persona_bob", &[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score < results[1].score);
        assert_eq!(results[0].chunk.text, "Hello world");

        assert!(store.drop_collection("persona_bob").await.unwrap());
        assert!(!store.drop_collection("persona_bob").await.unwrap());
        assert!(store.search("persona_bob", &[1.0, 0.0, 0.0], 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_collections_sorted() {
        let store = MemoryVectorStore::new();
        store.create_collection("persona_zed").await.unwrap();
        store.create_collection("persona_amy").await.unwrap();

        assert_eq!(
            store.list_collections().await.unwrap(),
            vec!["persona_amy", "persona_zed"]
        );
        assert!(store.exists("persona_amy").await.unwrap());
    }
}
