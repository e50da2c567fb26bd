//! Engine parameters: use case loop control.
//!
//! [`EngineParams`] groups the timeouts and retry settings that control the
//! conversation loop in
//! [`RunConversationUseCase`](crate::use_cases::run_conversation::RunConversationUseCase)
//! and the capability calls in
//! [`RunMatchUseCase`](crate::use_cases::run_match::RunMatchUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeouts, retry context and batch concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Upper bound for one turn generation call.
    pub turn_timeout: Duration,
    /// Upper bound for the embedding call.
    pub embedding_timeout: Duration,
    /// Upper bound for the reviewer call.
    pub review_timeout: Duration,
    /// Turns of context kept for the single retry after a failed turn.
    pub retry_context_turns: usize,
    /// Conversations run at once by the batch use case.
    pub batch_concurrency: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(60),
            embedding_timeout: Duration::from_secs(30),
            review_timeout: Duration::from_secs(90),
            retry_context_turns: 2,
            batch_concurrency: 4,
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout = timeout;
        self
    }

    pub fn with_review_timeout(mut self, timeout: Duration) -> Self {
        self.review_timeout = timeout;
        self
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }
}
