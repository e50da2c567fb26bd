//! Conversation configuration from TOML (`[conversation]` section)

use matchmaker_domain::{ConversationConfig, Speaker};
use serde::{Deserialize, Serialize};

/// Raw conversation pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConversationConfig {
    pub max_turns: usize,
    pub closing_grace: usize,
    /// `a` / `profile_1` or `b` / `profile_2`
    pub opener: Speaker,
    /// Most recent turns sent with each prompt (unset = whole transcript)
    pub context_window: Option<usize>,
    pub max_message_chars: usize,
    pub turn_timeout_seconds: u64,
}

impl Default for FileConversationConfig {
    fn default() -> Self {
        let defaults = ConversationConfig::default();
        Self {
            max_turns: defaults.max_turns,
            closing_grace: defaults.closing_grace,
            opener: defaults.opener,
            context_window: defaults.context_window,
            max_message_chars: defaults.max_message_chars,
            turn_timeout_seconds: 60,
        }
    }
}

impl FileConversationConfig {
    pub fn to_conversation_config(&self) -> ConversationConfig {
        ConversationConfig::new(self.max_turns, self.closing_grace)
            .with_opener(self.opener)
            .with_context_window(self.context_window)
            .with_max_message_chars(self.max_message_chars)
    }
}
