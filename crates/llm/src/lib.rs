//! Chatrelay LLM Service
//!
//! Provides the chat-completion seam used by the relay:
//! - `OpenAiService`, a single-attempt client for OpenAI-compatible endpoints
//! - `MockLlmService` (behind `test-support`) for exercising callers offline

pub mod openai;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiService;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    /// Transport failure, including an elapsed deadline
    #[error("LLM network error: {0}")]
    Network(String),

    #[error("LLM decode error: {0}")]
    Decode(String),

    #[error("LLM returned no choices")]
    EmptyResponse,

    #[error("LLM API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Role of a message on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: LlmRole,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LlmRole::Assistant,
            content: content.into(),
        }
    }
}

/// Chat completion request body, serialized as-is to the upstream endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<LlmMessage>,
    /// End-user identity forwarded for upstream abuse monitoring
    pub user: String,
}

/// Text of the first choice plus whatever metadata the provider echoed back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: Option<String>,
    pub finish_reason: Option<String>,
}

/// LLM service configuration.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    /// Base URL without the `/v1/chat/completions` suffix
    pub base_url: String,
    /// `None` means a call may take as long as the provider takes
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Chat completion backend.
///
/// Implementations make exactly one attempt per call; callers decide what a
/// failure means.
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
