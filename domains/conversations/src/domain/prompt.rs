//! Completion request assembly
//!
//! Turns a user's stored history into the payload sent upstream: a freshly
//! synthesized persona message followed by the history in stored order.

use chatrelay_llm::{CompletionRequest, LlmMessage};

use super::entities::ChatMessage;

/// Prefix put in front of the persona text in the system message
pub const PERSONA_PREFIX: &str = "Context: ";

/// Builds upstream completion requests for a fixed model and persona
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    model: String,
    persona: String,
}

impl PromptBuilder {
    pub fn new(model: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            persona: persona.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn persona_message(&self) -> LlmMessage {
        LlmMessage::system(format!("{}{}", PERSONA_PREFIX, self.persona))
    }

    /// `messages` is always `[persona] ++ history`.
    pub fn build(&self, user_id: &str, history: &[ChatMessage]) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(self.persona_message());
        messages.extend(history.iter().map(LlmMessage::from));

        CompletionRequest {
            model: self.model.clone(),
            messages,
            user: user_id.to_string(),
        }
    }
}
