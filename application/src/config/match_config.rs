//! MatchConfig: everything a match run needs besides the ports.

use super::EngineParams;
use matchmaker_domain::{ConversationConfig, DomainError, GatePolicy, Lexicon};

/// Container for the domain policies and engine parameters of a run.
///
/// | Field | Owner | Used by |
/// |-------|-------|---------|
/// | `conversation` | domain | state machine |
/// | `gate` | domain | decision gate |
/// | `lexicon` | domain | termination, classifier, gate |
/// | `params` | application | timeouts, retry, batch |
#[derive(Debug, Clone, Default)]
pub struct MatchConfig {
    pub conversation: ConversationConfig,
    pub gate: GatePolicy,
    pub lexicon: Lexicon,
    pub params: EngineParams,
}

impl MatchConfig {
    pub fn new(conversation: ConversationConfig) -> Self {
        Self {
            conversation,
            ..Default::default()
        }
    }

    pub fn with_gate(mut self, gate: GatePolicy) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_params(mut self, params: EngineParams) -> Self {
        self.params = params;
        self
    }

    /// Validate every section before any turn runs
    pub fn validate(&self) -> Result<(), DomainError> {
        self.conversation.validate()?;
        self.gate.validate().map_err(DomainError::InvalidConfig)?;
        if self.params.turn_timeout.is_zero()
            || self.params.embedding_timeout.is_zero()
            || self.params.review_timeout.is_zero()
        {
            return Err(DomainError::InvalidConfig(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sections() {
        let bad_turns = MatchConfig::new(ConversationConfig::new(4, 4));
        assert!(matches!(
            bad_turns.validate(),
            Err(DomainError::InvalidConfig(_))
        ));

        let zero_timeout = MatchConfig::default()
            .with_params(EngineParams::default().with_turn_timeout(Duration::ZERO));
        assert!(zero_timeout.validate().is_err());
    }
}
