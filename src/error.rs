//! Error types for backend communication and configuration

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the Rythm'it backend.
///
/// Kept `Clone` (messages are stringified) so it can ride inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout, body read error...
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Body was not JSON, or not the expected envelope shape.
    #[error("malformed response: {message}")]
    Malformed { message: String },

    #[error("invalid URL: {message}")]
    InvalidUrl { message: String },
}

impl ApiError {
    /// Stable label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "transport",
            ApiError::HttpStatus { .. } => "http_status",
            ApiError::Malformed { .. } => "malformed",
            ApiError::InvalidUrl { .. } => "invalid_url",
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ApiError::Malformed { .. })
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Malformed { message: err.to_string() }
        } else if let Some(status) = err.status() {
            ApiError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Transport { message: err.to_string() }
        }
    }
}

/// Failure loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
