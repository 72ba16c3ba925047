//! Text generation service.
//!
//! The generator is opaque to the rest of the crate: it takes a system
//! prompt and a user prompt and returns free text.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text generation backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply to `prompt` under the given system instructions.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;

    /// Model identifier, for display.
    fn model(&self) -> &str;
}
