//! OpenAI-compatible adapters
//!
//! One [`OpenAiClient`] talks to any endpoint that speaks the OpenAI chat
//! completion and embedding wire format. The adapters map it onto the
//! application ports.

pub mod adapters;
pub mod client;
pub mod error;

pub use adapters::{OpenAiEmbedder, OpenAiReviewer, OpenAiTurnGenerator};
pub use client::OpenAiClient;
pub use error::ProviderError;
