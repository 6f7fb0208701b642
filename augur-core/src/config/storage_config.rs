//! Storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// SQLite database settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path. `None` keeps storage in memory (tests).
    pub db_path: Option<PathBuf>,
    /// Read connection pool size.
    pub read_pool_size: Option<usize>,
}
