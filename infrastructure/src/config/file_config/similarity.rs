//! Similarity configuration from TOML (`[similarity]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimilarityConfig {
    /// Upper bound for the embedding call before similarity degrades to 0.0
    pub timeout_seconds: u64,
}

impl Default for FileSimilarityConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
