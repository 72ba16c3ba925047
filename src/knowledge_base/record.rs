//! Persona record: display name and the list of ingested sources.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Metadata kept next to a persona's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    /// Name as first given by the user.
    pub name: String,
    /// Ingested sources, in ingestion order, without duplicates.
    #[serde(default)]
    pub sources: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonaRecord {
    pub fn new(name: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            sources: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a source. Returns `false` if it was already listed.
    pub fn add_source(&mut self, source: &str) -> bool {
        if self.sources.iter().any(|s| s == source) {
            return false;
        }
        self.sources.push(source.to_string());
        self.updated_at = Utc::now();
        true
    }

    /// Load a record, or `None` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the record, replacing any previous version in one rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}
