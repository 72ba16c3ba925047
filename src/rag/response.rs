//! Persona responses: retrieved context handed to a generator.

use super::{context::format_context_for_prompt, ContextBuilder, ContextChunk};
use crate::error::Result;
use crate::generation::Generator;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Answers questions in the voice of one persona.
pub struct PersonaResponder {
    context_builder: ContextBuilder,
    generator: Arc<dyn Generator>,
}

impl PersonaResponder {
    pub fn new(context_builder: ContextBuilder, generator: Arc<dyn Generator>) -> Self {
        Self {
            context_builder,
            generator,
        }
    }

    fn system_prompt(&self) -> String {
        let name = self.context_builder.persona();
        format!(
            "You are {name}.\n\n\
             Respond as {name}, using their knowledge, perspective and way of speaking.\n\
             Only use the provided context for questions about {name}'s expertise.\n\
             If the context says \"{sentinel}\" or does not cover the question, say you don't have that information.\n\
             Stay in character.",
            name = name,
            sentinel = super::NO_CONTEXT,
        )
    }

    /// Build the user prompt from the context string and the raw question.
    fn user_prompt(&self, context: &str, question: &str) -> String {
        format!(
            "Based on the following context from {}'s transcripts, answer the question.\n\n\
             Context:\n{}\n\n\
             Question: {}",
            self.context_builder.persona(),
            context,
            question
        )
    }

    /// Ask a single question.
    #[instrument(skip(self), fields(persona = %self.context_builder.persona()))]
    pub async fn ask(&self, question: &str) -> Result<PersonaResponse> {
        info!("Processing question: {}", question);

        let sources = self.context_builder.build(question).await;
        let context = format_context_for_prompt(&sources);

        let answer = self
            .generator
            .generate(&self.system_prompt(), &self.user_prompt(&context, question))
            .await?;

        debug!("Generated response with {} sources", sources.len());
        Ok(PersonaResponse { answer, sources })
    }
}

/// A persona answer with the chunks it was grounded on.
#[derive(Debug, Clone)]
pub struct PersonaResponse {
    /// The generated answer.
    pub answer: String,
    /// Source chunks used for the answer.
    pub sources: Vec<ContextChunk>,
}

impl PersonaResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\n{} #{} (distance: {:.3})",
                    source.source, source.chunk_index, source.score
                ));
            }
        }

        output
    }
}
