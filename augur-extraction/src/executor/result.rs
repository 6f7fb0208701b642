//! The feature vector result — the persisted artifact of one run.

use augur_core::constants::SCHEMA_VERSION;
use augur_core::types::collections::BTreeMap;
use augur_core::types::{BuildId, FeatureValue, RepoId};
use serde::{Deserialize, Serialize};

/// Overall outcome of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Every planned extractor completed without error.
    Success,
    /// At least one extractor failed or was skipped; the rest completed.
    Partial,
    /// No extractor completed successfully.
    Failed,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

/// Why a feature was not computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A required resource was never acquired.
    MissingResource,
    /// An upstream feature was defaulted after a failure and the extractor
    /// opted out of degraded execution.
    DegradedUpstream,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingResource => "missing_resource",
            Self::DegradedUpstream => "degraded_upstream",
        }
    }
}

/// A feature recorded with its declared default instead of a computed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub feature: String,
    pub extractor: String,
    pub reason: SkipReason,
}

/// One failure recorded during the run, keyed by extractor group (or
/// `acquisition` for resource failures).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub group: String,
    /// Extractor id or acquisition task name.
    pub source: String,
    pub message: String,
}

/// The merged output of one extraction run.
///
/// Exactly one vector exists per (repo, build) pair per scope and schema
/// version; the storage layer upserts on that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVectorResult {
    pub repo_id: RepoId,
    pub build_id: BuildId,
    pub scope: String,
    pub schema_version: String,
    pub status: ExtractionStatus,
    pub features: BTreeMap<String, FeatureValue>,
    pub skipped: Vec<SkippedFeature>,
    pub errors: Vec<ErrorEntry>,
    pub succeeded_extractors: u32,
    pub failed_extractors: u32,
    pub duration_ms: u64,
}

impl FeatureVectorResult {
    pub fn new(repo_id: RepoId, build_id: BuildId, scope: &str) -> Self {
        Self {
            repo_id,
            build_id,
            scope: scope.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            status: ExtractionStatus::Success,
            features: BTreeMap::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            succeeded_extractors: 0,
            failed_extractors: 0,
            duration_ms: 0,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Success
    }

    /// Human-readable error strings, one per recorded entry.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{} [{}]: {}", e.group, e.source, e.message))
            .collect()
    }
}
