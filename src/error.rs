//! Error types for Mimic.

use thiserror::Error;

/// Library-level error type for Mimic operations.
#[derive(Error, Debug)]
pub enum MimicError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No captions available for: {0}")]
    NoCaptionsAvailable(String),

    #[error("No such content: {0}")]
    NoSuchContent(String),

    #[error("Invalid chunk parameters: window_size={window_size}, overlap={overlap} (need window_size > 0 and overlap < window_size)")]
    InvalidChunkParameters { window_size: usize, overlap: usize },

    #[error("Caption source error: {0}")]
    CaptionSource(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Ingestion of '{id}' failed: {reason}")]
    Ingestion { id: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MimicError {
    /// Wrap an error with the content identifier whose ingestion failed.
    pub fn ingestion(id: impl Into<String>, err: MimicError) -> Self {
        match err {
            e @ MimicError::Ingestion { .. } => e,
            other => MimicError::Ingestion {
                id: id.into(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result type alias for Mimic operations.
pub type Result<T> = std::result::Result<T, MimicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_error_reports_id() {
        let err = MimicError::ingestion("abc123", MimicError::NoCaptionsAvailable("abc123".into()));
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("No captions available"));
    }

    #[test]
    fn test_ingestion_error_not_double_wrapped() {
        let inner = MimicError::ingestion("a", MimicError::Storage("disk full".into()));
        let outer = MimicError::ingestion("b", inner);
        match outer {
            MimicError::Ingestion { id, .. } => assert_eq!(id, "a"),
            _ => panic!("expected ingestion error"),
        }
    }
}
