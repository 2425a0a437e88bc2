//! In-memory conversation store
//!
//! Histories are keyed by the caller-supplied identity and live for the
//! lifetime of the process. The map is sharded, so callers for different
//! identities only contend when they hash to the same shard, and every
//! operation on one identity runs under that identity's shard lock.

use dashmap::DashMap;

use crate::domain::entities::{ChatMessage, Role};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// History for the identity could not grow
    #[error("conversation storage exhausted: {0}")]
    Exhausted(String),
}

/// How much history is kept per identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    /// Keep every message forever
    #[default]
    Unbounded,
    /// Keep only the newest `n` messages, dropping the oldest on append
    MaxMessages(usize),
}

impl RetentionPolicy {
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(max) => RetentionPolicy::MaxMessages(max),
            None => RetentionPolicy::Unbounded,
        }
    }
}

/// Identity-keyed, append-only chat histories
#[derive(Debug, Default)]
pub struct ConversationStore {
    histories: DashMap<String, Vec<ChatMessage>>,
    retention: RetentionPolicy,
}

impl ConversationStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            histories: DashMap::new(),
            retention,
        }
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Append one message to the end of `user_id`'s history, creating it if absent
    pub fn append(
        &self,
        user_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<(), StoreError> {
        let mut history = self.histories.entry(user_id.to_string()).or_default();

        // Reserve before evicting so a failed append loses nothing
        history
            .try_reserve(1)
            .map_err(|e| StoreError::Exhausted(e.to_string()))?;

        if let RetentionPolicy::MaxMessages(max) = self.retention {
            let max = max.max(1);
            if history.len() >= max {
                let excess = history.len() + 1 - max;
                history.drain(..excess);
            }
        }

        history.push(ChatMessage::new(role, content));

        tracing::trace!(user = %user_id, role = %role, len = history.len(), "Appended message");
        Ok(())
    }

    /// Snapshot of `user_id`'s history; empty for an unknown identity.
    ///
    /// Reading never creates an entry.
    pub fn history_of(&self, user_id: &str) -> Vec<ChatMessage> {
        self.histories
            .get(user_id)
            .map(|history| history.value().clone())
            .unwrap_or_default()
    }

    /// Number of stored messages for `user_id`
    pub fn len(&self, user_id: &str) -> usize {
        self.histories
            .get(user_id)
            .map(|history| history.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, user_id: &str) -> bool {
        self.len(user_id) == 0
    }

    /// Number of identities with a stored history
    pub fn user_count(&self) -> usize {
        self.histories.len()
    }
}
