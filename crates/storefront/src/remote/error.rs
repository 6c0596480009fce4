//! Error types for remote document stores.

use thiserror::Error;

/// Errors that can occur when talking to the remote document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The database returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Failed to parse a response or event payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// The live update stream failed or was closed by the server.
    #[error("stream error: {0}")]
    Stream(String),

    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The path is empty or malformed.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
}

/// Error body returned by the Realtime Database REST API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub error: String,
}
