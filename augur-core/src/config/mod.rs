//! Configuration system for Augur.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod acquisition_config;
pub mod augur_config;
pub mod extraction_config;
pub mod storage_config;
pub mod telemetry_config;

pub use acquisition_config::AcquisitionConfig;
pub use augur_config::{AugurConfig, CliOverrides};
pub use extraction_config::ExtractionConfig;
pub use storage_config::StorageConfig;
pub use telemetry_config::TelemetryConfig;
