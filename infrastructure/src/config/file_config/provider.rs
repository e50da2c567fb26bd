//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible endpoint used for chat, review and embeddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the API (anything speaking the OpenAI wire format).
    pub base_url: String,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Model used to generate persona turns.
    pub chat_model: String,
    /// Model used for the post-conversation review. Falls back to `chat_model`.
    pub review_model: Option<String>,
    /// Model used for persona embeddings.
    pub embedding_model: String,
    /// Sampling temperature for turn generation.
    pub temperature: f32,
    /// Max tokens per generated turn.
    pub max_tokens: u32,
    /// HTTP timeout per request; also bounds the review call.
    pub timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            review_model: None,
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: 0.7,
            max_tokens: 400,
            timeout_seconds: 90,
        }
    }
}

impl FileProviderConfig {
    pub fn review_model(&self) -> &str {
        self.review_model.as_deref().unwrap_or(&self.chat_model)
    }

    /// Read the API key from the configured environment variable.
    ///
    /// A missing key is not an error: local OpenAI-compatible servers
    /// usually accept unauthenticated requests.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
