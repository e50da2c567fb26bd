//! Application-level configuration.
//!
//! - [`EngineParams`]: timeouts, retry context, batch concurrency
//! - [`MatchConfig`]: domain policies plus engine parameters for one run

pub mod engine_params;
pub mod match_config;

pub use engine_params::EngineParams;
pub use match_config::MatchConfig;
