//! Workflow extractor — shape of the CI workflow definition.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::spec::names as resource;

pub const JOB_COUNT: &str = "workflow_job_count";
pub const STEP_COUNT: &str = "workflow_step_count";
pub const ON_SCHEDULE: &str = "workflow_on_schedule";
pub const USES_CACHE: &str = "workflow_uses_cache";

pub struct WorkflowExtractor;

impl FeatureExtractor for WorkflowExtractor {
    fn id(&self) -> &str {
        "workflow"
    }

    fn group(&self) -> &str {
        "workflow"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            JOB_COUNT.to_string(),
            STEP_COUNT.to_string(),
            ON_SCHEDULE.to_string(),
            USES_CACHE.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::REPO_CONFIG.to_string()]
    }

    fn priority(&self) -> i32 {
        60
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let yaml = ctx
            .settings()
            .and_then(|s| s.workflow_yaml.as_deref())
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "workflow".to_string(),
                input: "workflow_yaml".to_string(),
            })?;

        let doc: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| ExtractError::Parse {
                extractor: "workflow".to_string(),
                what: "workflow yaml".to_string(),
                message: e.to_string(),
            })?;

        let jobs = doc.get("jobs").and_then(|j| j.as_mapping());
        let job_count = jobs.map(|m| m.len()).unwrap_or(0);

        let mut step_count = 0usize;
        let mut uses_cache = false;
        if let Some(jobs) = jobs {
            for (_, job) in jobs {
                let steps = job.get("steps").and_then(|s| s.as_sequence());
                if let Some(steps) = steps {
                    step_count += steps.len();
                    for step in steps {
                        if let Some(uses) = step.get("uses").and_then(|u| u.as_str()) {
                            if uses.starts_with("actions/cache") {
                                uses_cache = true;
                            }
                        }
                    }
                }
            }
        }

        // `on` may be a scalar trigger, a sequence, or a mapping.
        let on = doc.get("on");
        let on_schedule = match on {
            Some(serde_yaml::Value::String(s)) => s == "schedule",
            Some(serde_yaml::Value::Sequence(seq)) => {
                seq.iter().any(|v| v.as_str() == Some("schedule"))
            }
            Some(serde_yaml::Value::Mapping(map)) => {
                map.contains_key(&serde_yaml::Value::from("schedule"))
            }
            _ => false,
        };

        let mut features = FxHashMap::default();
        features.insert(JOB_COUNT.to_string(), job_count.into());
        features.insert(STEP_COUNT.to_string(), step_count.into());
        features.insert(ON_SCHEDULE.to_string(), on_schedule.into());
        features.insert(USES_CACHE.to_string(), uses_cache.into());
        Ok(features)
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (JOB_COUNT, FeatureValue::Int(0)),
            (STEP_COUNT, FeatureValue::Int(0)),
            (ON_SCHEDULE, FeatureValue::Bool(false)),
            (USES_CACHE, FeatureValue::Bool(false)),
        ])
    }
}
