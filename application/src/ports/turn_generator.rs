//! Turn generator port
//!
//! Defines the interface for producing one persona-agent utterance. Message
//! content is opaque to the engine; only its length and phrases matter.

use async_trait::async_trait;
use matchmaker_domain::{Persona, Phase, Speaker, Turn, TurnPlan, TurnPrompt};
use thiserror::Error;

/// Errors that can occur while generating a turn
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Generation timed out")]
    Timeout,

    #[error("Generator returned an empty message")]
    EmptyResponse,

    #[error("Message too long: {len} characters (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Everything the generator needs for one turn
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub speaker: Speaker,
    pub persona: Persona,
    pub counterpart: Persona,
    pub turn_index: usize,
    pub phase: Phase,
    /// Visible transcript window, oldest first
    pub history: Vec<Turn>,
    /// Set on the retry after a failed attempt
    pub abbreviated: bool,
}

impl TurnRequest {
    pub fn new(plan: TurnPlan, persona: &Persona, counterpart: &Persona, history: &[Turn]) -> Self {
        Self {
            speaker: plan.speaker,
            persona: persona.clone(),
            counterpart: counterpart.clone(),
            turn_index: plan.turn_index,
            phase: plan.phase,
            history: history.to_vec(),
            abbreviated: false,
        }
    }

    /// Same turn with only the last `keep` turns of context
    pub fn abbreviated(&self, keep: usize) -> Self {
        let start = self.history.len().saturating_sub(keep);
        Self {
            history: self.history[start..].to_vec(),
            abbreviated: true,
            ..self.clone()
        }
    }

    /// Borrowed view for prompt rendering
    pub fn prompt(&self) -> TurnPrompt<'_> {
        TurnPrompt {
            speaker: self.speaker,
            persona: &self.persona,
            counterpart: &self.counterpart,
            turn_index: self.turn_index,
            phase: self.phase,
            history: &self.history,
            abbreviated: self.abbreviated,
        }
    }
}

/// Produces persona-agent utterances.
///
/// Implementations must not keep per-conversation state; one instance is
/// shared by every conversation in a batch.
#[async_trait]
pub trait TurnGenerator: Send + Sync {
    async fn generate_turn(&self, request: &TurnRequest) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviated_keeps_last_turns() {
        let a = Persona::new("a", "n", "p").unwrap();
        let b = Persona::new("b", "n", "p").unwrap();
        let history: Vec<Turn> = (0..5)
            .map(|i| Turn::new(Speaker::A, format!("m{i}"), Phase::Discovery))
            .collect();
        let plan = TurnPlan {
            turn_index: 5,
            speaker: Speaker::B,
            phase: Phase::DeepDive,
        };
        let request = TurnRequest::new(plan, &b, &a, &history);
        let retry = request.abbreviated(2);

        assert!(retry.abbreviated);
        assert_eq!(retry.history.len(), 2);
        assert_eq!(retry.history[0].message, "m3");
        assert_eq!(retry.turn_index, 5);
        assert_eq!(retry.prompt().persona.id(), "b");
    }
}
