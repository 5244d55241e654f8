//! Error types for the REST-backed store.

use thiserror::Error;

/// Errors that can occur during `RestStore` operations.
#[derive(Error, Debug)]
pub enum RestStoreError {
    /// Base URL could not be parsed.
    #[error("Invalid store base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Transport-level failure (connect, send, read body).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Unexpected status {status} from {path}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
    },

    /// Response body did not match the expected row shape.
    #[error("Failed to decode {path} response: {source}")]
    Decode {
        /// Request path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Mutation returned no representation row.
    #[error("Store returned no record for {0}")]
    EmptyResponse(&'static str),
}
