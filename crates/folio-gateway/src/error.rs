//! Gateway error types.

use thiserror::Error;

/// Errors from the generation gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure talking to the API.
    #[error("gateway transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("gateway returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Failure while reading the streamed response.
    #[error("gateway stream error: {0}")]
    Stream(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
