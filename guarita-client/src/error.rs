//! Client error types

use thiserror::Error;

/// Client error type
///
/// Bodies attached to API errors are already sanitized; they are safe to
/// show to the operator or to log.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Operator token rejected (401/403)
    #[error("Access denied")]
    AccessDenied,

    /// Ticket or participant not found (404)
    #[error("Not found")]
    NotFound,

    /// Any other non-2xx response, body pre-sanitized
    #[error("Status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Image could not be downloaded or resolved
    #[error("Image unavailable: {0}")]
    ImageUnavailable(String),

    /// Base URL or other configuration problem
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Cache file IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
