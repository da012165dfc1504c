//! Error types for language model backed generation.

use thiserror::Error;

/// Errors raised by completion clients.
///
/// None of these escape [`LlmTransformer::transform`](crate::LlmTransformer::transform),
/// which falls back to deterministic generation instead.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured for a backend that needs one.
    #[error("No API key configured for the language model backend")]
    MissingApiKey,

    /// The configuration cannot be used to build a client.
    #[error("Invalid language model configuration: {0}")]
    InvalidConfig(String),

    /// The request could not be sent or the response could not be read.
    #[error("HTTP request to language model failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Language model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not the expected JSON.
    #[error("Failed to decode language model response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response carried no usable completion text.
    #[error("Language model returned an empty completion")]
    EmptyResponse,
}

pub type LlmResult<T> = Result<T, LlmError>;
