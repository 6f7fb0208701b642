//! Resource acquisition errors.

use super::error_code::{self, AugurErrorCode};

/// Errors raised by resource providers during acquisition.
///
/// `Transient` failures are retry candidates for the acquisition layer's
/// retry policy; everything else is permanent for the current run.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("failed to initialize resource '{resource}': {message}")]
    InitializationFailed { resource: String, message: String },

    #[error("transient failure acquiring resource '{resource}': {message}")]
    Transient { resource: String, message: String },

    #[error("resource '{resource}' is unavailable")]
    Unavailable { resource: String },

    #[error("repository lock poisoned for '{repo}'")]
    LockPoisoned { repo: String },
}

impl ResourceError {
    /// Whether the acquisition layer may retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// The resource this error concerns, when known.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::InitializationFailed { resource, .. }
            | Self::Transient { resource, .. }
            | Self::Unavailable { resource } => Some(resource),
            Self::LockPoisoned { .. } => None,
        }
    }
}

impl AugurErrorCode for ResourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InitializationFailed { .. } => error_code::RESOURCE_INIT_FAILED,
            Self::Transient { .. } => error_code::RESOURCE_TRANSIENT,
            Self::Unavailable { .. } => error_code::RESOURCE_UNAVAILABLE,
            Self::LockPoisoned { .. } => error_code::REPO_LOCK_POISONED,
        }
    }
}
