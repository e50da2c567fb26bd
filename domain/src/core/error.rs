//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid persona: {0}")]
    InvalidPersona(String),

    #[error("Invalid conversation config: {0}")]
    InvalidConfig(String),

    #[error("Conversation already ended")]
    ConversationEnded,

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error was caused by caller-supplied input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidPersona(_) | DomainError::InvalidConfig(_)
        )
    }
}
