//! Error handling for Augur.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod executor_error;
pub mod extract_error;
pub mod extraction_error;
pub mod registry_error;
pub mod resource_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::AugurErrorCode;
pub use executor_error::ExecutorError;
pub use extract_error::ExtractError;
pub use extraction_error::ExtractionError;
pub use registry_error::RegistryError;
pub use resource_error::ResourceError;
pub use storage_error::StorageError;
