//! Error types for the OpenAI-compatible adapter

use matchmaker_application::{EmbeddingError, GenerationError, ReviewError};
use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur when talking to an OpenAI-compatible API
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API returned error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Response contained no choices")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_decode() {
            ProviderError::ParseError(e.to_string())
        } else {
            ProviderError::Http(e.to_string())
        }
    }
}

impl From<ProviderError> for GenerationError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Timeout => GenerationError::Timeout,
            ProviderError::EmptyResponse => GenerationError::EmptyResponse,
            other => GenerationError::Provider(other.to_string()),
        }
    }
}

impl From<ProviderError> for ReviewError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Timeout => ReviewError::Timeout,
            ProviderError::ParseError(msg) => ReviewError::InvalidResponse(msg),
            other => ReviewError::Provider(other.to_string()),
        }
    }
}

impl From<ProviderError> for EmbeddingError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Timeout => EmbeddingError::Timeout,
            ProviderError::ParseError(msg) => EmbeddingError::InvalidResponse(msg),
            other => EmbeddingError::Unavailable(other.to_string()),
        }
    }
}
