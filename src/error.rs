//! Lobby error types with HTTP status code mapping.
//!
//! Matchmaking operations themselves never fail; [`LobbyError`] covers
//! the edges: configuration, request validation, and WebSocket parsing.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid peer id: peer id is empty"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Lobby error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Protocol   | 400 / 404                 |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// Peer identifier was empty or too long.
    #[error("invalid peer id: {0}")]
    InvalidPeerId(String),

    /// WebSocket frame could not be parsed.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// WebSocket command name is not recognised.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// A retry scheduler is already attached to the engine.
    #[error("retry scheduler already running")]
    SchedulerRunning,
}

impl LobbyError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidPeerId(_) => 1001,
            Self::MalformedMessage(_) => 2001,
            Self::UnknownCommand(_) => 2002,
            Self::Config(_) => 3001,
            Self::SchedulerRunning => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPeerId(_) | Self::MalformedMessage(_) => StatusCode::BAD_REQUEST,
            Self::UnknownCommand(_) => StatusCode::NOT_FOUND,
            Self::Config(_) | Self::SchedulerRunning => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON error body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
            details: None,
        }
    }
}

impl IntoResponse for LobbyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_body(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
