//! Configuration settings for Mimic.

use crate::chunking::{validate_window, ChunkUnit};
use crate::error::{MimicError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub storage: StorageSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub captions: CaptionSettings,
    pub generation: GenerationSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.mimic".to_string(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Root directory holding one sub-directory per persona collection.
    pub collections_dir: String,
    /// Directory for persona records.
    pub personas_dir: String,
    /// Directory for exported transcripts.
    pub transcripts_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            collections_dir: "~/.mimic/collections".to_string(),
            personas_dir: "~/.mimic/personas".to_string(),
            transcripts_dir: "~/.mimic/transcripts".to_string(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding provider (openai, hashing).
    pub provider: String,
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Base URL of an OpenAI-compatible embeddings endpoint.
    pub base_url: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            base_url: "http://localhost:11434/v1".to_string(),
        }
    }
}

/// Text chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Granularity of the sliding window (characters, words).
    pub unit: ChunkUnit,
    /// Window size in units.
    pub window_size: usize,
    /// Overlap between consecutive windows in units.
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            unit: ChunkUnit::Characters,
            window_size: 1000,
            overlap: 200,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks retrieved per query.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Caption fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// Language codes tried in order when picking a caption track.
    pub preferred_languages: Vec<String>,
    /// Timeout for downloading a caption body.
    pub fetch_timeout_seconds: u64,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            preferred_languages: ["en", "en-US", "en-GB", "en-CA", "en-AU"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fetch_timeout_seconds: 10,
        }
    }
}

/// Text generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Chat model used for answers.
    pub model: String,
    /// Base URL of an OpenAI-compatible chat endpoint.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            temperature: 0.7,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would fail later in the pipeline.
    pub fn validate(&self) -> Result<()> {
        validate_window(self.chunking.window_size, self.chunking.overlap)?;
        if self.retrieval.top_k == 0 {
            return Err(MimicError::Config("retrieval.top_k must be positive".to_string()));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MimicError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mimic")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded collections root.
    pub fn collections_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.collections_dir)
    }

    /// Get the expanded persona record directory.
    pub fn personas_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.personas_dir)
    }

    /// Get the expanded transcript export directory.
    pub fn transcripts_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.transcripts_dir)
    }

    /// Point every storage directory below `root`. Used by tests and `--data-dir`.
    pub fn with_data_root(mut self, root: &std::path::Path) -> Self {
        let join = |name: &str| root.join(name).to_string_lossy().into_owned();
        self.general.data_dir = root.to_string_lossy().into_owned();
        self.storage.collections_dir = join("collections");
        self.storage.personas_dir = join("personas");
        self.storage.transcripts_dir = join("transcripts");
        self
    }
}
