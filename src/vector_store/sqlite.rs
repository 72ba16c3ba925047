//! SQLite-based vector store implementation.
//!
//! Each collection lives in its own directory under the store root with a
//! single `vectors.db` file inside. Similarity is computed in Rust over all
//! rows of the collection.
//!
//! Connections are opened per operation, so separate store instances over
//! the same root observe each other's committed writes.

use super::{rank_by_distance, IndexedVector, SearchResult, VectorStore};
use crate::chunking::Chunk;
use crate::error::{MimicError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const DB_FILE: &str = "vectors.db";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS vectors (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        persona TEXT NOT NULL,
        source TEXT NOT NULL,
        chunk_index INTEGER NOT NULL,
        text TEXT NOT NULL,
        embedding BLOB NOT NULL,
        indexed_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_vectors_source ON vectors(source);
"#;

/// SQLite-based vector store with one database per collection.
pub struct SqliteVectorStore {
    root: PathBuf,
}

impl SqliteVectorStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(MimicError::InvalidInput(format!(
                "Invalid collection key: {:?}",
                key
            )));
        }
        Ok(self.root.join(key))
    }

    fn db_path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.collection_dir(key)?.join(DB_FILE))
    }

    /// Open (and initialize) the collection database, creating it if needed.
    fn open_or_create(&self, key: &str) -> Result<Connection> {
        let dir = self.collection_dir(key)?;
        std::fs::create_dir_all(&dir)?;

        let conn = Connection::open(dir.join(DB_FILE))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    /// Open an existing collection database without creating anything.
    fn open_existing(&self, key: &str) -> Result<Option<Connection>> {
        let path = self.db_path(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(Connection::open(path)?))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding
            .iter()
            .flat_map(|f| f.to_le_bytes())
            .collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self))]
    async fn create_collection(&self, key: &str) -> Result<()> {
        self.open_or_create(key)?;
        debug!("Collection {} ready", key);
        Ok(())
    }

    #[instrument(skip(self, vectors), fields(count = vectors.len()))]
    async fn insert_batch(&self, key: &str, vectors: &[IndexedVector]) -> Result<usize> {
        let mut conn = self.open_or_create(key)?;
        let tx = conn.transaction()?;

        for vector in vectors {
            tx.execute(
                r#"
                INSERT INTO vectors (id, persona, source, chunk_index, text, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    vector.id.to_string(),
                    vector.chunk.persona,
                    vector.chunk.source,
                    vector.chunk.chunk_index,
                    vector.chunk.text,
                    Self::embedding_to_bytes(&vector.embedding),
                    vector.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Inserted {} vectors into {}", vectors.len(), key);
        Ok(vectors.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(
        &self,
        key: &str,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let Some(conn) = self.open_existing(key)? else {
            debug!("Collection {} does not exist", key);
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT persona, source, chunk_index, text, embedding
            FROM vectors
            ORDER BY seq
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                let embedding_bytes: Vec<u8> = row.get(4)?;
                Ok((
                    Chunk {
                        persona: row.get(0)?,
                        source: row.get(1)?,
                        chunk_index: row.get(2)?,
                        text: row.get(3)?,
                    },
                    Self::bytes_to_embedding(&embedding_bytes),
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let results = rank_by_distance(query_embedding, rows, limit);
        debug!("Found {} matching vectors in {}", results.len(), key);
        Ok(results)
    }

    async fn count(&self, key: &str) -> Result<usize> {
        let Some(conn) = self.open_existing(key)? else {
            return Ok(0);
        };

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM vectors", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.db_path(key)?.is_file())
    }

    #[instrument(skip(self))]
    async fn drop_collection(&self, key: &str) -> Result<bool> {
        let dir = self.collection_dir(key)?;
        if !dir.exists() {
            return Ok(false);
        }

        // Renaming is atomic: after this the collection is gone for every reader.
        let tombstone = self.root.join(format!(".trash-{}-{}", key, Uuid::new_v4()));
        std::fs::rename(&dir, &tombstone)
            .map_err(|e| MimicError::Storage(format!("Failed to delete collection {}: {}", key, e)))?;

        if let Err(e) = std::fs::remove_dir_all(&tombstone) {
            warn!("Collection {} deleted but cleanup of {:?} failed: {}", key, tombstone, e);
        }

        info!("Dropped collection {}", key);
        Ok(true)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || !entry.path().join(DB_FILE).is_file() {
                continue;
            }
            keys.push(name);
        }

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(text: &str, index: u32, embedding: Vec<f32>) -> IndexedVector {
        IndexedVector::new(
            Chunk {
                text: text.to_string(),
                source: "talk".to_string(),
                chunk_index: index,
                persona: "alice".to_string(),
            },
            embedding,
        )
    }

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::new(dir.path());

        let inserted = store
            .insert_batch(
                "persona_alice",
                &[
                    vector("first", 0, vec![1.0, 0.0, 0.0]),
                    vector("second", 1, vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(store.count("persona_alice").await.unwrap(), 2);

        let results = store.search("persona_alice", &[0.0, 1.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.text, "second");
        assert_eq!(results[0].chunk.chunk_index, 1);
        assert!(results[0].score.abs() < 0.001);
        assert!(results[0].score < results[1].score);

        assert_eq!(store.list_collections().await.unwrap(), vec!["persona_alice"]);
    }

    #[tokio::test]
    async fn test_absent_collection_reads_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::new(dir.path());

        assert!(store.search("persona_nobody", &[1.0], 5).await.unwrap().is_empty());
        assert_eq!(store.count("persona_nobody").await.unwrap(), 0);
        assert!(!store.exists("persona_nobody").await.unwrap());
        assert!(!dir.path().join("persona_nobody").exists());
    }

    #[tokio::test]
    async fn test_drop_collection_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::new(dir.path());

        store
            .insert_batch("persona_bob", &[vector("hi", 0, vec![1.0])])
            .await
            .unwrap();

        assert!(store.drop_collection("persona_bob").await.unwrap());
        assert!(!store.drop_collection("persona_bob").await.unwrap());
        assert_eq!(store.count("persona_bob").await.unwrap(), 0);
        assert!(store.list_collections().await.unwrap().is_empty());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_separate_instances_share_writes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SqliteVectorStore::new(dir.path());
        let reader = SqliteVectorStore::new(dir.path());

        writer
            .insert_batch("persona_carol", &[vector("x", 0, vec![1.0, 0.0])])
            .await
            .unwrap();
        assert_eq!(reader.count("persona_carol").await.unwrap(), 1);

        writer
            .insert_batch("persona_carol", &[vector("y", 1, vec![0.0, 1.0])])
            .await
            .unwrap();
        assert_eq!(reader.count("persona_carol").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_collection_and_hidden_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::new(dir.path());

        store.create_collection("persona_dave").await.unwrap();
        std::fs::create_dir_all(dir.path().join(".trash-old")).unwrap();
        std::fs::create_dir_all(dir.path().join("stray")).unwrap();

        assert!(store.exists("persona_dave").await.unwrap());
        assert_eq!(store.count("persona_dave").await.unwrap(), 0);
        assert_eq!(store.list_collections().await.unwrap(), vec!["persona_dave"]);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::new(dir.path());

        assert!(matches!(
            store.create_collection("persona_../escape").await,
            Err(MimicError::InvalidInput(_))
        ));
        assert!(store.exists(".hidden").await.is_err());
        assert!(store.exists("..").await.is_err());
    }

    #[tokio::test]
    async fn test_keys_with_inner_dots_are_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::new(dir.path());

        store
            .insert_batch("persona_wait..._what", &[vector("hm", 0, vec![1.0, 0.0])])
            .await
            .unwrap();
        assert_eq!(store.count("persona_wait..._what").await.unwrap(), 1);
        assert_eq!(store.list_collections().await.unwrap(), vec!["persona_wait..._what"]);
        assert!(dir.path().join("persona_wait..._what").join(DB_FILE).is_file());
    }
}
