//! Embedding generation for indexing and similarity search.
//!
//! The same embedder must be used when indexing a collection and when
//! querying it, otherwise distances are meaningless.

mod hashing;
mod openai;

pub use hashing::HashingEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::EmbeddingSettings;
use crate::error::{MimicError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Build the embedder named by the settings.
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    match settings.provider.to_lowercase().as_str() {
        "openai" | "ollama" => Ok(Arc::new(OpenAIEmbedder::with_config(
            &settings.base_url,
            &settings.model,
            settings.dimensions as usize,
        ))),
        "hashing" => Ok(Arc::new(HashingEmbedder::new(settings.dimensions as usize))),
        other => Err(MimicError::Config(format!(
            "Unknown embedding provider: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_embedder_by_provider() {
        let mut settings = EmbeddingSettings::default();
        settings.provider = "hashing".to_string();
        settings.dimensions = 64;
        assert_eq!(create_embedder(&settings).unwrap().dimensions(), 64);

        settings.provider = "openai".to_string();
        assert_eq!(create_embedder(&settings).unwrap().dimensions(), 64);

        settings.provider = "word2vec".to_string();
        assert!(matches!(create_embedder(&settings), Err(MimicError::Config(_))));
    }
}
