//! Registry construction errors.
//!
//! All of these are configuration-time errors: they are raised while the
//! feature registry is built at process start, before any extraction request
//! is served, and an invalid registry is fatal.

use super::error_code::{self, AugurErrorCode};

/// Errors detected while building or querying the feature registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("feature '{feature}' is provided by both '{first}' and '{second}'")]
    DuplicateFeature {
        feature: String,
        first: String,
        second: String,
    },

    #[error("feature '{feature}' (required by '{required_by}') has no registered provider")]
    UnknownFeature {
        feature: String,
        required_by: String,
    },

    #[error("resource '{resource}' (required by '{required_by}') is not in the resource catalog")]
    UnknownResource {
        resource: String,
        required_by: String,
    },

    #[error("feature dependency cycle: {cycle}")]
    CyclicDependency { cycle: String },
}

impl AugurErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateFeature { .. } => error_code::DUPLICATE_FEATURE,
            Self::UnknownFeature { .. } => error_code::UNKNOWN_FEATURE,
            Self::UnknownResource { .. } => error_code::UNKNOWN_RESOURCE,
            Self::CyclicDependency { .. } => error_code::CYCLIC_DEPENDENCY,
        }
    }
}
