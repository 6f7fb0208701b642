//! Extractor runtime errors.
//!
//! Caught per-extractor inside the executor and recorded as error entries;
//! they never propagate past a single extractor invocation.

use super::error_code::{self, AugurErrorCode};

/// Errors an extractor may return from `extract`.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extractor '{extractor}' missing input '{input}'")]
    MissingInput { extractor: String, input: String },

    #[error("extractor '{extractor}' failed to parse {what}: {message}")]
    Parse {
        extractor: String,
        what: String,
        message: String,
    },

    #[error("extractor '{extractor}' failed: {message}")]
    Failed { extractor: String, message: String },
}

impl ExtractError {
    /// The extractor that raised this error.
    pub fn extractor(&self) -> &str {
        match self {
            Self::MissingInput { extractor, .. }
            | Self::Parse { extractor, .. }
            | Self::Failed { extractor, .. } => extractor,
        }
    }
}

impl AugurErrorCode for ExtractError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => error_code::EXTRACT_MISSING_INPUT,
            Self::Parse { .. } => error_code::EXTRACT_PARSE_FAILED,
            Self::Failed { .. } => error_code::EXTRACT_FAILED,
        }
    }
}
