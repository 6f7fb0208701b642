//! Telemetry configuration.

use serde::{Deserialize, Serialize};

/// Opt-in anonymous usage telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
}
