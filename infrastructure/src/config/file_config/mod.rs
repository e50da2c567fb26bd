//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate:
//! `[gate]` is a [`GatePolicy`] and `[lexicon]` is a [`Lexicon`], so any
//! field left out keeps its built-in default.

mod batch;
mod conversation;
mod output;
mod provider;
mod similarity;

pub use batch::FileBatchConfig;
pub use conversation::FileConversationConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use similarity::FileSimilarityConfig;

use matchmaker_application::{EngineParams, MatchConfig};
use matchmaker_domain::{GatePolicy, Lexicon};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    InvalidTimeout { field: &'static str },

    #[error("{field}: model name cannot be empty")]
    EmptyModelName { field: &'static str },

    #[error("provider.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("batch.concurrency cannot be 0")]
    InvalidConcurrency,

    #[error("[conversation] {0}")]
    InvalidConversation(String),

    #[error("[gate] {0}")]
    InvalidGate(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat / review / embedding endpoint
    pub provider: FileProviderConfig,
    /// Conversation pacing
    pub conversation: FileConversationConfig,
    /// Embedding call settings
    pub similarity: FileSimilarityConfig,
    /// Decision gate thresholds and caps
    pub gate: GatePolicy,
    /// Phrase lists for outcome classification
    pub lexicon: Lexicon,
    /// Output settings
    pub output: FileOutputConfig,
    /// Batch settings
    pub batch: FileBatchConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let timeouts = [
            ("provider.timeout_seconds", self.provider.timeout_seconds),
            (
                "conversation.turn_timeout_seconds",
                self.conversation.turn_timeout_seconds,
            ),
            ("similarity.timeout_seconds", self.similarity.timeout_seconds),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigValidationError::InvalidTimeout { field: *field });
        }

        let models = [
            ("provider.chat_model", self.provider.chat_model.as_str()),
            ("provider.review_model", self.provider.review_model()),
            (
                "provider.embedding_model",
                self.provider.embedding_model.as_str(),
            ),
        ];
        if let Some((field, _)) = models.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModelName { field: *field });
        }

        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if self.batch.concurrency == 0 {
            return Err(ConfigValidationError::InvalidConcurrency);
        }

        self.conversation
            .to_conversation_config()
            .validate()
            .map_err(|e| ConfigValidationError::InvalidConversation(e.to_string()))?;
        self.gate
            .validate()
            .map_err(ConfigValidationError::InvalidGate)?;

        Ok(())
    }

    /// Engine timeouts derived from the provider, conversation and
    /// similarity sections.
    pub fn engine_params(&self) -> EngineParams {
        EngineParams::default()
            .with_turn_timeout(Duration::from_secs(
                self.conversation.turn_timeout_seconds,
            ))
            .with_embedding_timeout(Duration::from_secs(self.similarity.timeout_seconds))
            .with_review_timeout(Duration::from_secs(self.provider.timeout_seconds))
            .with_batch_concurrency(self.batch.concurrency)
    }

    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig::new(self.conversation.to_conversation_config())
            .with_gate(self.gate.clone())
            .with_lexicon(self.lexicon.clone())
            .with_params(self.engine_params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchmaker_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
chat_model = "gpt-4o"
review_model = "gpt-4o"
temperature = 0.4

[conversation]
max_turns = 8
closing_grace = 2
opener = "b"
turn_timeout_seconds = 20

[similarity]
timeout_seconds = 10

[gate]
low_similarity_threshold = 0.3
outcome_cap = 0.7

[lexicon]
version = "team-2026-10"
disinterest = ["not for us"]

[output]
format = "full"
color = false

[batch]
concurrency = 2
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.chat_model, "gpt-4o");
        assert_eq!(config.conversation.max_turns, 8);
        assert_eq!(config.gate.low_similarity_threshold, 0.3);
        assert_eq!(config.gate.outcome_cap, 0.7);
        assert_eq!(config.gate.not_a_fit_cap, GatePolicy::default().not_a_fit_cap);
        assert_eq!(config.lexicon.version, "team-2026-10");
        assert_eq!(config.lexicon.disinterest, vec!["not for us".to_string()]);
        assert_eq!(config.lexicon.closure, Lexicon::default().closure);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert_eq!(config.batch.concurrency, 2);
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.lexicon, Lexicon::default());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = FileConfig::default();
        config.similarity.timeout_seconds = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout {
                field: "similarity.timeout_seconds"
            })
        );
    }

    #[test]
    fn test_validate_closing_grace_not_below_max_turns() {
        let mut config = FileConfig::default();
        config.conversation.max_turns = 4;
        config.conversation.closing_grace = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidConversation(_))
        ));
    }

    #[test]
    fn test_validate_empty_model_name() {
        let mut config = FileConfig::default();
        config.provider.embedding_model = "  ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName {
                field: "provider.embedding_model"
            })
        );
    }

    #[test]
    fn test_validate_bad_gate_policy() {
        let mut config = FileConfig::default();
        config.gate.outcome_cap = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidGate(_))
        ));
    }

    #[test]
    fn test_to_match_config() {
        let mut config = FileConfig::default();
        config.conversation.max_turns = 6;
        config.conversation.turn_timeout_seconds = 15;
        config.provider.timeout_seconds = 45;
        config.batch.concurrency = 3;

        let match_config = config.to_match_config();
        assert_eq!(match_config.conversation.max_turns, 6);
        assert_eq!(match_config.params.turn_timeout, Duration::from_secs(15));
        assert_eq!(match_config.params.review_timeout, Duration::from_secs(45));
        assert_eq!(match_config.params.batch_concurrency, 3);
        assert!(match_config.validate().is_ok());
    }
}
