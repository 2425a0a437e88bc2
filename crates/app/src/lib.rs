//! Chatrelay application composition root
//!
//! Wires configuration, the conversation store, and the completion client
//! into a single router.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::Router;
use chatrelay_common::Config;
use chatrelay_conversations::{
    ConversationStore, ConversationsState, PromptBuilder, RetentionPolicy,
};
use chatrelay_llm::{LlmConfig, LlmService, OpenAiService};
use tower_http::set_header::SetResponseHeaderLayer;

/// Create the main application router from configuration
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let llm = OpenAiService::new(LlmConfig {
        api_key: config.openai_api_key.clone(),
        base_url: config.openai_base_url.clone(),
        timeout: config.upstream_timeout,
    })
    .map_err(|e| anyhow::anyhow!("Failed to create completion client: {}", e))?;

    Ok(build_app(config, Arc::new(llm)))
}

/// Build the router around an already constructed completion backend
pub fn build_app(config: &Config, llm: Arc<dyn LlmService>) -> Router {
    let retention = RetentionPolicy::from_limit(config.history_max_messages);
    let store = Arc::new(ConversationStore::new(retention));
    let prompt = PromptBuilder::new(config.openai_model.clone(), config.persona.clone());

    tracing::info!(
        model = %config.openai_model,
        retention = ?retention,
        cors_enabled = config.cors_enabled,
        "Conversation relay configured"
    );

    let state = ConversationsState::new(store, prompt, llm, config.cors_enabled);

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(chatrelay_conversations::routes().with_state(state))
        .layer(body_limit_layer(config.max_body_bytes));

    if config.cors_enabled {
        app.layer(build_cors_layer())
    } else {
        app
    }
}

/// Cap on request bodies; larger bodies are answered with 413
pub fn body_limit_layer(max_bytes: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_bytes)
}

/// Stamp `Access-Control-Allow-Origin: *` on every response.
///
/// `OPTIONS /` is answered by the relay handler itself, which sets the full
/// preflight header set.
pub fn build_cors_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    )
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
