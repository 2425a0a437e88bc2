//! Conversations domain state

use crate::domain::prompt::PromptBuilder;
use crate::repository::ConversationStore;
use chatrelay_llm::LlmService;
use std::sync::Arc;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub store: Arc<ConversationStore>,
    pub prompt: Arc<PromptBuilder>,
    pub llm: Arc<dyn LlmService>,
    /// Answer `OPTIONS` probes with permissive CORS headers
    pub cors_enabled: bool,
}

impl ConversationsState {
    pub fn new(
        store: Arc<ConversationStore>,
        prompt: PromptBuilder,
        llm: Arc<dyn LlmService>,
        cors_enabled: bool,
    ) -> Self {
        Self {
            store,
            prompt: Arc::new(prompt),
            llm,
            cors_enabled,
        }
    }
}
