//! Scan extractor — static-analysis and security findings per severity.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::handle::ResourceHandle;
use crate::resources::spec::names as resource;

pub const CRITICAL: &str = "scan_critical";
pub const HIGH: &str = "scan_high";
pub const MEDIUM: &str = "scan_medium";
pub const LOW: &str = "scan_low";
pub const CODE_SMELLS: &str = "scan_code_smells";
pub const TOOLS_REPORTING: &str = "scan_tools_reporting";

pub struct ScanExtractor;

impl FeatureExtractor for ScanExtractor {
    fn id(&self) -> &str {
        "scan"
    }

    fn group(&self) -> &str {
        "scan"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            CRITICAL.to_string(),
            HIGH.to_string(),
            MEDIUM.to_string(),
            LOW.to_string(),
            CODE_SMELLS.to_string(),
            TOOLS_REPORTING.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::SCAN_REPORTS.to_string()]
    }

    fn priority(&self) -> i32 {
        40
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let reports = ctx
            .resource(resource::SCAN_REPORTS)
            .and_then(ResourceHandle::as_scan_reports)
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "scan".to_string(),
                input: resource::SCAN_REPORTS.to_string(),
            })?;

        let mut critical = 0u32;
        let mut high = 0u32;
        let mut medium = 0u32;
        let mut low = 0u32;
        let mut code_smells = 0u32;
        for report in &reports.reports {
            critical += report.critical;
            high += report.high;
            medium += report.medium;
            low += report.low;
            code_smells += report.code_smells;
        }

        let mut features = FxHashMap::default();
        features.insert(CRITICAL.to_string(), critical.into());
        features.insert(HIGH.to_string(), high.into());
        features.insert(MEDIUM.to_string(), medium.into());
        features.insert(LOW.to_string(), low.into());
        features.insert(CODE_SMELLS.to_string(), code_smells.into());
        features.insert(TOOLS_REPORTING.to_string(), reports.reports.len().into());
        Ok(features)
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (CRITICAL, FeatureValue::Int(0)),
            (HIGH, FeatureValue::Int(0)),
            (MEDIUM, FeatureValue::Int(0)),
            (LOW, FeatureValue::Int(0)),
            (CODE_SMELLS, FeatureValue::Int(0)),
            (TOOLS_REPORTING, FeatureValue::Int(0)),
        ])
    }
}
