//! The feature extractor trait.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use crate::context::ExecutionContext;

/// A pluggable unit that computes one or more features from resources
/// and/or previously computed features.
///
/// Dependencies are declared explicitly — the resolver never infers them
/// from anything but `requires_resources` / `requires_features`. The set of
/// names returned by `extract` and `empty_values` must equal `provides`.
pub trait FeatureExtractor: Send + Sync {
    /// Unique identifier, used in error entries and ordering diagnostics.
    fn id(&self) -> &str;

    /// Group label (informational; groups can be disabled via config).
    fn group(&self) -> &str;

    /// Feature names this extractor produces atomically.
    fn provides(&self) -> Vec<String>;

    /// Resource names that must be in the context before `extract` runs.
    fn requires_resources(&self) -> Vec<String> {
        Vec::new()
    }

    /// Upstream feature names this extractor reads.
    fn requires_features(&self) -> Vec<String> {
        Vec::new()
    }

    /// Ordering tie-break among otherwise-unconstrained extractors; higher
    /// runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether to still run when an upstream feature was filled with its
    /// declared default after a failure. Defaults to graceful degradation.
    fn run_degraded(&self) -> bool {
        true
    }

    /// Compute this extractor's features from the context.
    fn extract(&self, ctx: &ExecutionContext) -> Result<FxHashMap<String, FeatureValue>, ExtractError>;

    /// Neutral defaults recorded for every provided feature when this
    /// extractor fails or is skipped, so downstream extractors never see an
    /// absent key.
    fn empty_values(&self) -> FxHashMap<String, FeatureValue>;
}

/// Helper for building `empty_values` maps from static name/value pairs.
pub fn empty_map(pairs: &[(&str, FeatureValue)]) -> FxHashMap<String, FeatureValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
