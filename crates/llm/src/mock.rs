//! Mock LLM Service Implementation
//!
//! Records every request it receives and answers from a script of queued
//! outcomes, falling back to echoing the last message. Thread-safe via
//! `Arc<Mutex<>>`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::{CompletionRequest, CompletionResponse, LlmError, LlmService};

/// Mock LLM service for testing
#[derive(Debug, Clone, Default)]
pub struct MockLlmService {
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
}

impl MockLlmService {
    /// Create a new mock LLM service
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for the next unscripted call
    pub fn push_reply(&self, content: impl Into<String>) {
        self.script
            .lock()
            .expect("script lock poisoned: prior test panicked")
            .push_back(Ok(content.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_error(&self, error: LlmError) {
        self.script
            .lock()
            .expect("script lock poisoned: prior test panicked")
            .push_back(Err(error));
    }

    /// Return all recorded requests, oldest first
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .expect("requests lock poisoned: prior test panicked")
            .clone()
    }
}

#[async_trait::async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tracing::info!(user = %request.user, "Mock LLM service processing completion request");

        let scripted = self
            .script
            .lock()
            .map_err(|e| LlmError::Network(format!("script lock poisoned: {e}")))?
            .pop_front();

        let last_message = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "empty".to_string());
        let model = request.model.clone();

        self.requests
            .lock()
            .map_err(|e| LlmError::Network(format!("requests lock poisoned: {e}")))?
            .push(request);

        let content = match scripted {
            Some(outcome) => outcome?,
            None => format!("Mock response to: {}", last_message),
        };

        Ok(CompletionResponse {
            content,
            model: Some(model),
            finish_reason: Some("stop".to_string()),
        })
    }
}
