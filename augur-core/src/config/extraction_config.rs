//! Extraction behavior configuration.

use serde::{Deserialize, Serialize};

/// Controls executor and registry behavior for a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extractor groups excluded from `get_all(enabled_only = true)`.
    pub disabled_groups: Vec<String>,
    /// When true, a failed resource acquisition aborts the run instead of
    /// continuing in degraded mode.
    pub strict: Option<bool>,
    /// Scope label recorded on persisted vectors. Defaults to "build".
    pub scope: Option<String>,
}

impl ExtractionConfig {
    pub fn strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    pub fn scope(&self) -> &str {
        self.scope
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_SCOPE)
    }
}
