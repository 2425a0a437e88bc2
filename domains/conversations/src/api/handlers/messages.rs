//! Message relay handler
//!
//! Gates run in a fixed order and the first failure answers the request:
//! CORS probe, identity, method, body. Only then is conversation state
//! touched.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chatrelay_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::api::middleware::ConversationsState;
use crate::api::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, USER_HEADER};
use crate::domain::entities::Role;
use crate::repository::StoreError;

/// Request for sending a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageResponse {
    pub reply: String,
}

/// Relay one chat message from the caller to the completion provider
pub async fn relay_message(
    State(state): State<ConversationsState>,
    request: Request,
) -> Result<Response> {
    if state.cors_enabled && request.method() == Method::OPTIONS {
        return Ok(preflight_response());
    }

    let user_id = read_identity(request.headers())?;

    if request.method() != Method::POST {
        return Err(Error::MethodNotAllowed(format!(
            "Method {} not supported",
            request.method()
        )));
    }

    // Honors the router's `DefaultBodyLimit`
    let bytes = Bytes::from_request(request, &state).await.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge(rejection.body_text())
        } else {
            tracing::warn!(user = %user_id, error = %rejection.body_text(), "Failed to read request body");
            Error::Internal("Failed to read request body".to_string())
        }
    })?;

    let req: SendMessageRequest = serde_json::from_slice(&bytes)
        .map_err(|e| Error::Client(format!("Failed to decode request body: {}", e)))?;

    let reply = relay(&state, &user_id, req.message).await?;

    Ok((StatusCode::OK, Json(SendMessageResponse { reply })).into_response())
}

/// Append the user turn, ask the provider, and append its reply.
///
/// A failed upstream call leaves the user turn in place with no reply after it.
pub async fn relay(state: &ConversationsState, user_id: &str, message: String) -> Result<String> {
    state
        .store
        .append(user_id, Role::User, message)
        .map_err(storage_error)?;

    let history = state.store.history_of(user_id);
    let request = state.prompt.build(user_id, &history);

    let response = state.llm.complete(request).await.map_err(|e| {
        tracing::warn!(user = %user_id, error = %e, "Completion request failed");
        Error::Upstream("Upstream completion request failed".to_string())
    })?;

    state
        .store
        .append(user_id, Role::Assistant, response.content.clone())
        .map_err(storage_error)?;

    tracing::debug!(
        user = %user_id,
        history_len = history.len() + 1,
        model = response.model.as_deref().unwrap_or("unknown"),
        "Relayed message"
    );

    Ok(response.content)
}

fn read_identity(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(USER_HEADER)
        .ok_or_else(|| Error::Client("User header not found".to_string()))?;

    // Opaque label: any UTF-8 is accepted, not just visible ASCII
    let user_id = std::str::from_utf8(value.as_bytes())
        .map_err(|_| Error::Client("User header must be valid UTF-8".to_string()))?;

    if user_id.is_empty() {
        return Err(Error::Client("User header not found".to_string()));
    }

    Ok(user_id.to_string())
}

fn storage_error(e: StoreError) -> Error {
    Error::Storage(format!("Failed to store message: {}", e))
}

fn preflight_response() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS),
        ],
    )
        .into_response()
}
