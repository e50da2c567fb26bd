//! Minimal client for the OpenAI chat completion and embedding endpoints

use super::error::{ProviderError, Result};
use crate::config::FileProviderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Shared HTTP client for one OpenAI-compatible endpoint.
///
/// Holds no per-conversation state; one instance backs the generator, the
/// reviewer and the embedder.
#[derive(Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::ClientBuild(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &FileProviderConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> reqwest::RequestBuilder {
        let mut req = self.client.post(self.endpoint(path)).json(body);
        // Local models usually run without a key
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Send a chat completion and return the first choice's content
    pub async fn chat(&self, request: &ChatCompletionRequest<'_>) -> Result<String> {
        debug!(
            "chat/completions model={} messages={}",
            request.model,
            request.messages.len()
        );
        let response = self.send(self.post("chat/completions", request)).await?;
        let completion: ChatCompletionResponse = response.json().await?;
        first_choice(completion)
    }

    /// Embed `texts`, returning one vector per input in input order
    pub async fn embeddings(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!("embeddings model={} inputs={}", model, texts.len());
        let body = EmbeddingRequest { model, input: texts };
        let response = self.send(self.post("embeddings", &body)).await?;
        let parsed: EmbeddingResponse = response.json().await?;
        Ok(in_input_order(parsed))
    }
}

fn first_choice(completion: ChatCompletionResponse) -> Result<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ProviderError::EmptyResponse)
}

/// The API may return embedding items out of order; `index` is authoritative.
fn in_input_order(mut response: EmbeddingResponse) -> Vec<Vec<f32>> {
    response.data.sort_by_key(|d| d.index);
    response.data.into_iter().map(|d| d.embedding).collect()
}
