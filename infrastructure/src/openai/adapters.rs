//! Port implementations backed by [`OpenAiClient`]

use super::client::{ChatCompletionRequest, Message, OpenAiClient};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use matchmaker_application::{
    Embedder, EmbeddingError, GenerationError, ReviewError, ReviewRequest, Reviewer,
    TurnGenerator, TurnRequest,
};
use matchmaker_domain::core::string::{single_line, truncate};
use matchmaker_domain::{PromptTemplate, ProposedDecision, parse_reviewer_response};
use std::sync::Arc;
use tracing::warn;

/// Reviewer output kept in error messages
const RAW_SNIPPET_BYTES: usize = 200;

/// Generates persona turns through chat completions
pub struct OpenAiTurnGenerator {
    client: Arc<OpenAiClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiTurnGenerator {
    pub fn new(client: Arc<OpenAiClient>, config: &FileProviderConfig) -> Self {
        Self {
            client,
            model: config.chat_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn messages(request: &TurnRequest) -> Vec<Message> {
        vec![
            Message::system(PromptTemplate::persona_system()),
            Message::user(PromptTemplate::turn_prompt(&request.prompt())),
        ]
    }
}

#[async_trait]
impl TurnGenerator for OpenAiTurnGenerator {
    async fn generate_turn(&self, request: &TurnRequest) -> Result<String, GenerationError> {
        let chat = ChatCompletionRequest {
            model: &self.model,
            messages: Self::messages(request),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };
        Ok(self.client.chat(&chat).await?)
    }
}

/// Proposes a decision by asking the review model for a JSON verdict
pub struct OpenAiReviewer {
    client: Arc<OpenAiClient>,
    model: String,
}

impl OpenAiReviewer {
    pub fn new(client: Arc<OpenAiClient>, config: &FileProviderConfig) -> Self {
        Self {
            client,
            model: config.review_model().to_string(),
        }
    }

    fn messages(request: &ReviewRequest) -> Vec<Message> {
        vec![
            Message::system(PromptTemplate::review_system()),
            Message::user(PromptTemplate::review_payload(
                &request.persona_1,
                &request.persona_2,
                &request.signals,
                request.outcome,
                &request.transcript,
            )),
        ]
    }
}

#[async_trait]
impl Reviewer for OpenAiReviewer {
    async fn review(&self, request: &ReviewRequest) -> Result<ProposedDecision, ReviewError> {
        let chat = ChatCompletionRequest {
            model: &self.model,
            messages: Self::messages(request),
            temperature: Some(0.0),
            max_tokens: None,
        };
        let raw = self.client.chat(&chat).await?;
        parse_reviewer_response(&raw).ok_or_else(|| {
            warn!("Reviewer returned no usable JSON");
            unusable_review(&raw)
        })
    }
}

/// Embeds persona texts with the configured embedding model
pub struct OpenAiEmbedder {
    client: Arc<OpenAiClient>,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: Arc<OpenAiClient>, config: &FileProviderConfig) -> Self {
        Self {
            client,
            model: config.embedding_model.clone(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let vectors = self.client.embeddings(&self.model, texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} vectors, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

fn unusable_review(raw: &str) -> ReviewError {
    ReviewError::InvalidResponse(truncate(&single_line(raw), RAW_SNIPPET_BYTES))
}
