//! Application layer for matchmaker
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EngineParams, MatchConfig};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    embedder::{Embedder, EmbeddingError},
    progress::{NoProgress, ProgressNotifier},
    reviewer::{ReviewError, ReviewRequest, Reviewer},
    turn_generator::{GenerationError, TurnGenerator, TurnRequest},
};
pub use use_cases::run_batch::{BatchItem, BatchSummary, RunBatchUseCase};
pub use use_cases::run_conversation::{RunConversationInput, RunConversationUseCase};
pub use use_cases::run_match::{RunMatchError, RunMatchInput, RunMatchUseCase};
pub use use_cases::score_similarity::ScoreSimilarityUseCase;
