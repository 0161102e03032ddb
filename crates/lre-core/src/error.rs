//! Centralized error types for LRE.

use thiserror::Error;

/// Main error type for LRE operations.
#[derive(Error, Debug)]
pub enum LreError {
    #[error("Not an image: '{0}' (expected an image/* MIME type)")]
    NotAnImage(String),

    #[error("Invalid data URL: expected 'data:<mime>;base64,<payload>'")]
    InvalidDataUrl,

    #[error("Unsupported image extension: {0}")]
    UnsupportedExtension(String),

    #[error("Analysis service error (HTTP {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Analysis service returned an empty response")]
    EmptyResponse,

    #[error("Malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis task failed: {0}")]
    Task(String),
}

/// Result type for LRE operations.
pub type LreResult<T> = Result<T, LreError>;

impl LreError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Whether the error was caused by the user's input rather than the
    /// analysis service.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NotAnImage(_) | Self::InvalidDataUrl | Self::UnsupportedExtension(_)
        )
    }
}
