//! Executor defensive errors.
//!
//! These should not occur given the resolver's preconditions. When they do,
//! they indicate a bug in plan construction or context handling and are
//! raised rather than degraded.

use super::error_code::{self, AugurErrorCode};

/// Systemic errors raised by the executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("core resource '{resource}' missing from context (required by '{extractor}')")]
    MissingCoreResource { resource: String, extractor: String },

    #[error("execution context corrupted: {message}")]
    ContextCorrupted { message: String },
}

impl AugurErrorCode for ExecutorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCoreResource { .. } => error_code::MISSING_CORE_RESOURCE,
            Self::ContextCorrupted { .. } => error_code::CONTEXT_CORRUPTED,
        }
    }
}
