//! Top-level extraction errors.

use super::error_code::AugurErrorCode;
use super::{ConfigError, ExecutorError, RegistryError, ResourceError, StorageError};

/// Errors that can abort a whole extraction run.
/// Aggregates subsystem errors via `From` conversions.
///
/// Note the absence of `ExtractError`: extractor runtime failures are caught
/// inside the executor and recorded on the result, never raised to callers.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AugurErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Registry(e) => e.error_code(),
            Self::Resource(e) => e.error_code(),
            Self::Executor(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
