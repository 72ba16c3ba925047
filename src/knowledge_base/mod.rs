//! Registry of persona knowledge bases.
//!
//! Each persona owns one vector collection plus a JSON record under the
//! personas directory, both named by the persona's collection key.
//!
//! Persona names are normalized into collection keys, so "Alice" and
//! "alice" refer to the same knowledge base.

mod record;

pub use record::PersonaRecord;

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{
    checked_collection_key, collection_key, persona_name_from_key, VectorIndex, VectorStore,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Summary of one persona's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub persona: String,
    pub collection_name: String,
    pub document_count: usize,
}

/// Enumerates, creates and deletes persona knowledge bases.
#[derive(Clone)]
pub struct KnowledgeBase {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    personas_dir: PathBuf,
}

impl KnowledgeBase {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        personas_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            embedder,
            personas_dir: personas_dir.into(),
        }
    }

    pub fn personas_dir(&self) -> &Path {
        &self.personas_dir
    }

    /// Handle to a persona's vector index. Nothing is created until the first write.
    pub fn index(&self, persona: &str) -> VectorIndex {
        VectorIndex::new(persona, self.store.clone(), self.embedder.clone())
    }

    fn record_path(&self, persona: &str) -> PathBuf {
        self.personas_dir
            .join(format!("{}.json", collection_key(persona)))
    }

    /// Create an empty knowledge base, or return the existing record.
    #[instrument(skip(self))]
    pub async fn create(&self, persona: &str) -> Result<PersonaRecord> {
        self.store.create_collection(&checked_collection_key(persona)?).await?;

        let path = self.record_path(persona);
        match PersonaRecord::load(&path)? {
            Some(record) => Ok(record),
            None => {
                let record = PersonaRecord::new(persona.trim());
                record.save(&path)?;
                info!("Created persona {}", persona);
                Ok(record)
            }
        }
    }

    /// Persona names, sorted by collection key. Unreadable storage yields none.
    pub async fn list_personas(&self) -> Vec<String> {
        match self.store.list_collections().await {
            Ok(keys) => keys
                .iter()
                .filter_map(|key| persona_name_from_key(key))
                .collect(),
            Err(e) => {
                warn!("Listing personas failed: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn exists(&self, persona: &str) -> bool {
        self.index(persona).exists().await
    }

    /// Delete a persona's collection and record.
    ///
    /// Returns `false` if there was no collection to delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, persona: &str) -> Result<bool> {
        let removed = self.store.drop_collection(&collection_key(persona)).await?;

        let path = self.record_path(persona);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to remove persona record {:?}: {}", path, e);
            }
        }

        if removed {
            info!("Deleted persona {}", persona);
        }
        Ok(removed)
    }

    /// Collection statistics; the count falls back to 0 when storage is unreadable.
    pub async fn stats(&self, persona: &str) -> CollectionStats {
        let index = self.index(persona);
        CollectionStats {
            persona: persona.to_string(),
            collection_name: index.key().to_string(),
            document_count: index.count().await,
        }
    }

    /// The persona's record, if one has been written.
    pub fn record(&self, persona: &str) -> Result<Option<PersonaRecord>> {
        PersonaRecord::load(&self.record_path(persona))
    }

    /// Append a source to the persona's record, creating the record if needed.
    pub fn add_source(&self, persona: &str, source: &str) -> Result<()> {
        checked_collection_key(persona)?;
        let path = self.record_path(persona);
        let mut record =
            PersonaRecord::load(&path)?.unwrap_or_else(|| PersonaRecord::new(persona.trim()));
        record.add_source(source);
        record.save(&path)
    }
}
