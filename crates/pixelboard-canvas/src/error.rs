//! Error types for pixelboard-canvas
//!
//! This module provides error types for the canvas system,
//! including batch parsing, encoding, and configuration errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Canvas error type
#[derive(Debug, Error)]
pub enum Error {
    /// Paint batch could not be parsed
    #[error("invalid paint batch: {0}")]
    InvalidBatch(String),

    /// PNG encoding failed
    #[error("image encoding error: {0}")]
    ImageEncoding(String),

    /// Palette serialization failed
    #[error("palette encoding error: {0}")]
    PaletteEncoding(String),

    /// Color literal could not be parsed
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Configuration rejected at startup
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an invalid batch error
    #[must_use]
    pub fn invalid_batch(msg: impl Into<String>) -> Self {
        Self::InvalidBatch(msg.into())
    }

    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid color error
    #[must_use]
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Check if the error was caused by the client
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidBatch(_))
    }

    /// Get error code for logs and diagnostics
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBatch(_) => "invalid_batch",
            Self::ImageEncoding(_) => "image_encoding_error",
            Self::PaletteEncoding(_) => "palette_encoding_error",
            Self::InvalidColor(_) => "invalid_color",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }

    /// HTTP status reported to the caller
    #[must_use]
    pub fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Plain-text body reported to the caller
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidBatch(_) => "Invalid JSON",
            Self::ImageEncoding(_) => "Error encoding image",
            Self::PaletteEncoding(_) => "Error encoding palette",
            Self::InvalidColor(_) | Self::InvalidConfig(_) => "Internal server error",
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Self::ImageEncoding(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            warn!(code = self.code(), error = %self, "Rejected request");
        } else {
            error!(code = self.code(), error = %self, "Request failed");
        }
        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for canvas operations
pub type Result<T> = std::result::Result<T, Error>;
