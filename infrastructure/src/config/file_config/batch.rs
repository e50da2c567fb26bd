//! Batch configuration from TOML (`[batch]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// Pairs run at once when `--pairs` is given
    pub concurrency: usize,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}
