//! Route definitions for Conversations domain API

use axum::{routing::any, Router};

use super::handlers::messages;
use super::middleware::ConversationsState;

/// Create all Conversations domain API routes
///
/// The relay route accepts every method so the handler can apply its gates
/// in order (identity before method).
pub fn routes() -> Router<ConversationsState> {
    Router::new().route("/", any(messages::relay_message))
}
