//! Chat completions from an OpenAI-compatible endpoint.

use super::Generator;
use crate::config::GenerationSettings;
use crate::error::{MimicError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator backed by `/chat/completions`.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIGenerator {
    pub fn new(settings: &GenerationSettings) -> Self {
        Self {
            client: create_client(&settings.base_url),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    /// Override the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, system, prompt), fields(model = %self.model))]
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(|e| MimicError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| MimicError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| MimicError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            MimicError::Generation(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| MimicError::Generation("Empty response from model".to_string()))?
            .clone();

        debug!("Generated {} chars", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_override() {
        let generator = OpenAIGenerator::new(&GenerationSettings::default());
        assert_eq!(generator.model(), "llama3.2");
        assert_eq!(generator.with_model("mistral").model(), "mistral");
    }
}
