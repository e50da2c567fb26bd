//! Configuration file loading for matchmaker
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MATCHMAKER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./matchmaker.toml` or `./.matchmaker.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/matchmaker/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBatchConfig, FileConfig, FileConversationConfig,
    FileOutputConfig, FileProviderConfig, FileSimilarityConfig,
};
pub use loader::ConfigLoader;
