//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Client ID is already in use
    #[error("Client ID '{0}' is already connected")]
    DuplicateClientId(String),

    /// The server rejected the client ID
    #[error("Client ID '{0}' was rejected by the server")]
    InvalidClientId(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
