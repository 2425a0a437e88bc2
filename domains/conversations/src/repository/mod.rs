//! Storage for the Conversations domain

pub mod store;

pub use store::{ConversationStore, RetentionPolicy, StoreError};
