//! Error types for trikv

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Transport Errors ===
    #[error("Transport error on {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(String),

    // === Request Errors ===
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid storage mode: {0}")]
    InvalidMode(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Transport fault against a data-center endpoint
    pub fn transport(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::Transport {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Error::InvalidRequest(_) | Error::InvalidMode(_) | Error::InvalidConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Transport { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Implement From for common error types
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
