//! HTTP API for the Conversations domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ConversationsState;
pub use routes::routes;

/// Header carrying the caller's opaque identity
pub const USER_HEADER: &str = "user";

/// Methods advertised to CORS preflight probes
pub const CORS_ALLOW_METHODS: &str = "POST, GET, OPTIONS";

/// Request headers advertised to CORS preflight probes
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, User";
