//! Error types for promptlist
//!
//! Domain errors raised while generating a playlist, the HTTP mapping for
//! them, and startup configuration errors.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Playlist generation error
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Prompt absent, not a string, or blank after trimming
    #[error("Prompt is required")]
    MissingInput,

    /// Model reply is not a nested array of (title, artist) string pairs
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// Language-model or catalog transport failure (network, auth, non-2xx)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Anything unanticipated
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for playlist generation
pub type Result<T> = std::result::Result<T, PlaylistError>;

/// API error type
///
/// Validation failures are reported verbatim; everything else collapses to a
/// generic 500 and the detail only goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Prompt is required")]
    MissingInput,

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<PlaylistError> for ApiError {
    fn from(err: PlaylistError) -> Self {
        match err {
            PlaylistError::MissingInput => ApiError::MissingInput,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingInput => (StatusCode::BAD_REQUEST, "Prompt is required"),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Playlist request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Startup configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Read config {path:?} failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse config {path:?} failed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
