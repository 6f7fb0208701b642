//! Top-level Augur configuration with 4-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AcquisitionConfig, ExtractionConfig, StorageConfig, TelemetryConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`AUGUR_*`)
/// 3. Project config (`augur.toml` in project root)
/// 4. User config (`~/.augur/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AugurConfig {
    pub extraction: ExtractionConfig,
    pub acquisition: AcquisitionConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub acquisition_parallelism: Option<usize>,
    pub retry_max_attempts: Option<u32>,
    pub strict: Option<bool>,
    pub db_path: Option<std::path::PathBuf>,
}

impl AugurConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(_) => {
                        // Non-parse errors from user config are warnings, not fatal.
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("augur.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &AugurConfig) -> Result<(), ConfigError> {
        if let Some(attempts) = config.acquisition.retry_max_attempts {
            if attempts == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "acquisition.retry_max_attempts".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(base) = config.acquisition.retry_base_delay_ms {
            if base == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "acquisition.retry_base_delay_ms".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(par) = config.acquisition.parallelism {
            if par == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "acquisition.parallelism".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(size) = config.storage.read_pool_size {
            if size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.read_pool_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.augur/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(".augur").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut AugurConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: AugurConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut AugurConfig, other: &AugurConfig) {
        // Extraction
        if !other.extraction.disabled_groups.is_empty() {
            base.extraction.disabled_groups = other.extraction.disabled_groups.clone();
        }
        if other.extraction.strict.is_some() {
            base.extraction.strict = other.extraction.strict;
        }
        if other.extraction.scope.is_some() {
            base.extraction.scope = other.extraction.scope.clone();
        }

        // Acquisition
        if other.acquisition.parallelism.is_some() {
            base.acquisition.parallelism = other.acquisition.parallelism;
        }
        if other.acquisition.retry_max_attempts.is_some() {
            base.acquisition.retry_max_attempts = other.acquisition.retry_max_attempts;
        }
        if other.acquisition.retry_base_delay_ms.is_some() {
            base.acquisition.retry_base_delay_ms = other.acquisition.retry_base_delay_ms;
        }
        if other.acquisition.retry_max_delay_ms.is_some() {
            base.acquisition.retry_max_delay_ms = other.acquisition.retry_max_delay_ms;
        }
        if other.acquisition.clone_root.is_some() {
            base.acquisition.clone_root = other.acquisition.clone_root.clone();
        }
        if other.acquisition.log_root.is_some() {
            base.acquisition.log_root = other.acquisition.log_root.clone();
        }

        // Storage
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }

        // Telemetry
        if other.telemetry.enabled.is_some() {
            base.telemetry.enabled = other.telemetry.enabled;
        }
        if other.telemetry.endpoint.is_some() {
            base.telemetry.endpoint = other.telemetry.endpoint.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `AUGUR_ACQUISITION_PARALLELISM`, `AUGUR_EXTRACTION_STRICT`, etc.
    fn apply_env_overrides(config: &mut AugurConfig) {
        if let Ok(val) = std::env::var("AUGUR_ACQUISITION_PARALLELISM") {
            if let Ok(v) = val.parse::<usize>() {
                config.acquisition.parallelism = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUGUR_ACQUISITION_RETRY_MAX_ATTEMPTS") {
            if let Ok(v) = val.parse::<u32>() {
                config.acquisition.retry_max_attempts = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUGUR_ACQUISITION_CLONE_ROOT") {
            config.acquisition.clone_root = Some(val.into());
        }
        if let Ok(val) = std::env::var("AUGUR_ACQUISITION_LOG_ROOT") {
            config.acquisition.log_root = Some(val.into());
        }
        if let Ok(val) = std::env::var("AUGUR_EXTRACTION_STRICT") {
            if let Ok(v) = val.parse::<bool>() {
                config.extraction.strict = Some(v);
            }
        }
        if let Ok(val) = std::env::var("AUGUR_STORAGE_DB_PATH") {
            config.storage.db_path = Some(val.into());
        }
        if let Ok(val) = std::env::var("AUGUR_TELEMETRY_ENABLED") {
            if let Ok(v) = val.parse::<bool>() {
                config.telemetry.enabled = Some(v);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut AugurConfig, cli: &CliOverrides) {
        if let Some(v) = cli.acquisition_parallelism {
            config.acquisition.parallelism = Some(v);
        }
        if let Some(v) = cli.retry_max_attempts {
            config.acquisition.retry_max_attempts = Some(v);
        }
        if let Some(v) = cli.strict {
            config.extraction.strict = Some(v);
        }
        if let Some(ref v) = cli.db_path {
            config.storage.db_path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
