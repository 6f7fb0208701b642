//! Derived extractor — features computed purely from other features.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use super::{commit, logs};
use crate::context::ExecutionContext;

pub const TEST_FAILURE_RATE: &str = "test_failure_rate";
pub const CHANGE_CHURN: &str = "change_churn";
pub const FAILURE_DENSITY: &str = "failure_density";

/// Needs no resources: runs off upstream features alone, after the commit
/// and logs extractors (or their defaults, under graceful degradation).
pub struct DerivedExtractor;

impl FeatureExtractor for DerivedExtractor {
    fn id(&self) -> &str {
        "derived"
    }

    fn group(&self) -> &str {
        "derived"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            TEST_FAILURE_RATE.to_string(),
            CHANGE_CHURN.to_string(),
            FAILURE_DENSITY.to_string(),
        ]
    }

    fn requires_features(&self) -> Vec<String> {
        vec![
            logs::TESTS_RUN.to_string(),
            logs::TESTS_FAILED.to_string(),
            commit::LINES_ADDED.to_string(),
            commit::LINES_DELETED.to_string(),
        ]
    }

    fn priority(&self) -> i32 {
        10
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let tests_run = ctx
            .feature_or(logs::TESTS_RUN, FeatureValue::Int(0))
            .as_float()
            .unwrap_or(0.0);
        let tests_failed = ctx
            .feature_or(logs::TESTS_FAILED, FeatureValue::Int(0))
            .as_float()
            .unwrap_or(0.0);
        let added = ctx
            .feature_or(commit::LINES_ADDED, FeatureValue::Int(0))
            .as_float()
            .unwrap_or(0.0);
        let deleted = ctx
            .feature_or(commit::LINES_DELETED, FeatureValue::Int(0))
            .as_float()
            .unwrap_or(0.0);

        let churn = added + deleted;
        let failure_rate = if tests_run > 0.0 {
            tests_failed / tests_run
        } else {
            0.0
        };
        let density = if churn > 0.0 { tests_failed / churn } else { 0.0 };

        let mut features = FxHashMap::default();
        features.insert(TEST_FAILURE_RATE.to_string(), failure_rate.into());
        features.insert(CHANGE_CHURN.to_string(), churn.into());
        features.insert(FAILURE_DENSITY.to_string(), density.into());
        Ok(features)
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (TEST_FAILURE_RATE, FeatureValue::Float(0.0)),
            (CHANGE_CHURN, FeatureValue::Float(0.0)),
            (FAILURE_DENSITY, FeatureValue::Float(0.0)),
        ])
    }
}
