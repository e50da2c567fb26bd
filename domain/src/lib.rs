//! Domain layer for matchmaker
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! Two personas take alternating turns through a fixed phase schedule
//! (Opening → Discovery → DeepDive → Closing → Ended). The
//! [`ConversationState`] is the only writer of the transcript and decides
//! when the conversation ends.
//!
//! ## Assessment
//!
//! - **Outcome**: a deterministic, rule-ordered label over the transcript
//! - **Similarity**: directional cross-fit between needs and personalities
//! - **Decision gate**: constrains the reviewer's proposal using the outcome
//!   and similarity, so the final decision never contradicts hard signals

pub mod assessment;
pub mod config;
pub mod conversation;
pub mod core;
pub mod persona;
pub mod prompt;
pub mod report;
pub mod similarity;

// Re-export commonly used types
pub use assessment::{
    Classification, ClassificationBasis, Decision, DecisionGate, DecisionKind, GatePolicy,
    Lexicon, NextStepKind, Outcome, OutcomeClassifier, ProposedDecision, parse_reviewer_response,
};
pub use config::OutputFormat;
pub use conversation::{
    ConversationConfig, ConversationState, Metrics, Phase, TerminationReason, Turn, TurnPlan,
};
pub use core::error::DomainError;
pub use persona::{Persona, Speaker};
pub use prompt::{PromptTemplate, TurnPrompt};
pub use report::{MatchReport, RunStatus};
pub use similarity::{PersonaEmbeddings, SimilarityReport, SimilaritySignals, cosine_similarity};
