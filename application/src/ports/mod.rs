//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod embedder;
pub mod progress;
pub mod reviewer;
pub mod turn_generator;
