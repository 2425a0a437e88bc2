//! Conversations domain: per-user chat history relayed to an LLM

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{ChatMessage, Role};
pub use domain::prompt::PromptBuilder;

// Re-export repository types
pub use repository::{ConversationStore, RetentionPolicy, StoreError};

// Re-export API types
pub use api::handlers::messages::{relay, SendMessageRequest, SendMessageResponse};
pub use api::routes;
pub use api::ConversationsState;
