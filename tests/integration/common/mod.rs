//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - A stubbed completion provider (wiremock) and the relay wired to it
//! - Request builders and body helpers
//! - Canned upstream responses

use std::collections::HashMap;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chatrelay_common::Config;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const TEST_API_KEY: &str = "sk-integration-test"; // pragma: allowlist secret
pub const TEST_PERSONA: &str = "you are a test double";

/// Relay under test plus the upstream it talks to
pub struct RelayTestApp {
    pub upstream: MockServer,
    pub config: Config,
    router: Router,
}

impl RelayTestApp {
    pub async fn new() -> Result<Self> {
        Self::with_vars(&[]).await
    }

    /// Start with extra configuration variables layered over the test defaults
    pub async fn with_vars(extra: &[(&str, &str)]) -> Result<Self> {
        let upstream = MockServer::start().await;

        let mut vars: HashMap<String, String> = HashMap::from([
            ("OPENAI_API_KEY".to_string(), TEST_API_KEY.to_string()),
            ("OPENAI_BASE_URL".to_string(), upstream.uri()),
            ("PERSONA".to_string(), TEST_PERSONA.to_string()),
            ("UPSTREAM_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }

        let config = Config::from_lookup(|name| vars.get(name).cloned())?;
        let router = chatrelay_app::create_app(&config)?;

        Ok(Self {
            upstream,
            config,
            router,
        })
    }

    pub fn test_router(&self) -> Router {
        self.router.clone()
    }

    /// POST a chat body, returning status and raw body text
    pub async fn send(&self, user: Option<&str>, body: &str) -> (StatusCode, String) {
        self.request(Method::POST, user, body).await
    }

    pub async fn request(
        &self,
        method: Method,
        user: Option<&str>,
        body: &str,
    ) -> (StatusCode, String) {
        let resp = self
            .test_router()
            .oneshot(chat_request(method, user, body))
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// JSON bodies of every request the upstream received, oldest first
    pub async fn upstream_payloads(&self) -> Vec<Value> {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }

    /// Queue one successful reply
    pub async fn reply_once(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
            .up_to_n_times(1)
            .mount(&self.upstream)
            .await;
    }

    /// Queue one arbitrary upstream response
    pub async fn respond_once(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(template)
            .up_to_n_times(1)
            .mount(&self.upstream)
            .await;
    }

    /// Answer every call by echoing the caller's identity and latest message
    pub async fn echo_always(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(EchoResponder)
            .mount(&self.upstream)
            .await;
    }
}

/// Upstream body with a single choice
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo-0125",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// Contents of a payload's `messages`, as `(role, content)` pairs
pub fn message_pairs(payload: &Value) -> Vec<(String, String)> {
    payload["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| {
            (
                m["role"].as_str().unwrap().to_string(),
                m["content"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

pub fn chat_request(method: Method, user: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/")
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header("user", user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn message_body(message: &str) -> String {
    json!({ "message": message }).to_string()
}

struct EchoResponder;

impl Respond for EchoResponder {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let payload: Value = match serde_json::from_slice(&request.body) {
            Ok(v) => v,
            Err(_) => return ResponseTemplate::new(400),
        };
        let user = payload["user"].as_str().unwrap_or_default();
        let last = payload["messages"]
            .as_array()
            .and_then(|m| m.last())
            .and_then(|m| m["content"].as_str())
            .unwrap_or_default();
        ResponseTemplate::new(200).set_body_json(completion(&format!("{user} said {last}")))
    }
}
