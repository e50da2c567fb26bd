//! Embedding port
//!
//! Defines the interface for turning texts into vectors for similarity
//! scoring.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during embedding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("Embedding timed out")]
    Timeout,

    #[error("Embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Produces one embedding vector per input text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}
