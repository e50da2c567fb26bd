//! Reviewer port
//!
//! Defines the interface for the advisory reviewer that proposes a decision
//! for a finished conversation. Its output is always gated afterwards.

use async_trait::async_trait;
use matchmaker_domain::{Outcome, Persona, ProposedDecision, SimilaritySignals, Turn};
use thiserror::Error;

/// Errors that can occur during review
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Review timed out")]
    Timeout,

    #[error("Reviewer provider error: {0}")]
    Provider(String),

    #[error("Unparseable reviewer output: {0}")]
    InvalidResponse(String),
}

/// Input to the reviewer
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub persona_1: Persona,
    pub persona_2: Persona,
    pub signals: SimilaritySignals,
    pub outcome: Outcome,
    pub transcript: Vec<Turn>,
}

/// Proposes a decision for a finished conversation
#[async_trait]
pub trait Reviewer: Send + Sync {
    async fn review(&self, request: &ReviewRequest) -> Result<ProposedDecision, ReviewError>;
}
