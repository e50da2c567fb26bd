//! Infrastructure layer for matchmaker
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration, persona and report
//! file handling.

pub mod config;
pub mod logging;
pub mod openai;
pub mod persona;
pub mod report;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBatchConfig, FileConfig, FileConversationConfig,
    FileOutputConfig, FileProviderConfig, FileSimilarityConfig,
};
pub use logging::JsonlConversationLogger;
pub use openai::{OpenAiClient, OpenAiEmbedder, OpenAiReviewer, OpenAiTurnGenerator, ProviderError};
pub use persona::{PersonaLoadError, load_pairs, load_persona};
pub use report::{ReportWriteError, ReportWriter};
