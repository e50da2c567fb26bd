//! Prompt domain
//!
//! Templates for persona-agent turns and the reviewer.

mod template;

pub use template::{PromptTemplate, TurnPrompt};
