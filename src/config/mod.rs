//! Configuration module for Mimic.
//!
//! Settings are loaded once and passed explicitly into each component.

mod settings;

pub use settings::{
    CaptionSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, GenerationSettings,
    RetrievalSettings, Settings, StorageSettings,
};
