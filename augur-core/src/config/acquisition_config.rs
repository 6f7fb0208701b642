//! Resource acquisition configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ACQUISITION_PARALLELISM, MAX_RETRY_ATTEMPTS};

/// Controls the acquisition driver: concurrency, retry, and on-disk roots.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Concurrent tasks per plan level.
    pub parallelism: Option<usize>,
    /// Maximum attempts per acquisition task (1 = no retry).
    pub retry_max_attempts: Option<u32>,
    /// Base delay of the exponential backoff curve, in milliseconds.
    pub retry_base_delay_ms: Option<u64>,
    /// Backoff cap, in milliseconds.
    pub retry_max_delay_ms: Option<u64>,
    /// Root directory for shared repository clones.
    pub clone_root: Option<PathBuf>,
    /// Root directory where build logs are staged for the log provider.
    pub log_root: Option<PathBuf>,
}

impl AcquisitionConfig {
    pub fn parallelism(&self) -> usize {
        self.parallelism.unwrap_or(DEFAULT_ACQUISITION_PARALLELISM)
    }

    pub fn retry_max_attempts(&self) -> u32 {
        self.retry_max_attempts.unwrap_or(3).min(MAX_RETRY_ATTEMPTS)
    }

    pub fn retry_base_delay_ms(&self) -> u64 {
        self.retry_base_delay_ms.unwrap_or(250)
    }

    pub fn retry_max_delay_ms(&self) -> u64 {
        self.retry_max_delay_ms.unwrap_or(10_000)
    }

    pub fn clone_root(&self) -> PathBuf {
        self.clone_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("augur").join("clones"))
    }

    pub fn log_root(&self) -> PathBuf {
        self.log_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("augur").join("logs"))
    }
}
