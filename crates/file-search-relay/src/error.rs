//! Error types for the upload relay

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Relay errors
#[derive(Debug, Error)]
pub enum Error {
    /// Client input error (missing fields, disallowed file type)
    #[error("{0}")]
    Validation(String),

    /// Indexing did not complete within the wait limit
    #[error("Indexing timeout - processing took too long")]
    Timeout,

    /// File-search provider rejected a call or reported a failed operation
    #[error("{0}")]
    Provider(String),

    /// Upload succeeded but no document could be identified
    #[error("Upload completed but could not extract document info")]
    ExtractionFailed,

    /// Request body exceeds the configured upload limit
    #[error("File too large")]
    PayloadTooLarge,

    /// Unknown route (function binding only)
    #[error("Not found")]
    NotFound,

    /// Unsupported method (function binding only)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build a provider error from a failed API response.
    ///
    /// Prefers the message inside the Google error envelope
    /// (`{"error": {"code": .., "message": .., "status": ..}}`), then the raw
    /// body, then a generic status line.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ApiStatus,
        }

        if let Ok(envelope) = serde_json::from_str::<Envelope>(body) {
            if let Some(message) = envelope.error.message.filter(|m| !m.trim().is_empty()) {
                return Self::Provider(message);
            }
        }

        let body = body.trim();
        if body.is_empty() {
            Self::Provider(format!("File search request failed with status {}", status))
        } else {
            Self::Provider(body.to_string())
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::Provider(_)
            | Error::ExtractionFailed
            | Error::Config(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Status object used by the provider for both API errors and failed operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiStatus {
    /// Human-readable message, falling back to the status name or code
    pub fn describe(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
        match (&self.status, self.code) {
            (Some(status), _) => format!("Indexing operation failed: {}", status),
            (None, Some(code)) => format!("Indexing operation failed with code {}", code),
            (None, None) => "Indexing operation failed".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Upload error: {}", self);
        }

        let message = match &self {
            Error::Provider(msg) | Error::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
