//! Common error types and handling for Chatrelay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Request-level error, converted to an HTTP status with a plain-text body
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed caller input
    #[error("{0}")]
    Client(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    /// Request body exceeded the configured limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The completion provider failed, returned garbage, or returned nothing
    #[error("{0}")]
    Upstream(String),

    /// Conversation storage could not grow
    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Client(_) => StatusCode::BAD_REQUEST,
            Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Upstream(_) | Error::Storage(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code used in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Client(_) => "CLIENT_ERROR",
            Error::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            Error::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Error::Upstream(_) => "UPSTREAM_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Error::Storage(_) => {
                tracing::error!(error = %self, code = self.error_code(), "Conversation storage fault");
            }
            Error::Upstream(_) | Error::Internal(_) => {
                tracing::error!(error = %self, code = self.error_code(), "Internal server error");
            }
            Error::Client(_) | Error::MethodNotAllowed(_) | Error::PayloadTooLarge(_) => {
                tracing::debug!(error = %self, code = self.error_code(), "Rejected request");
            }
        }

        (status, self.to_string()).into_response()
    }
}
