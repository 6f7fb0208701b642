//! Discussion extractor — pull-request review and comment activity.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::handle::ResourceHandle;
use crate::resources::spec::names as resource;

pub const COMMENT_COUNT: &str = "pr_comment_count";
pub const REVIEW_COUNT: &str = "pr_review_count";
pub const APPROVAL_COUNT: &str = "pr_approval_count";
pub const CHANGED_FILES: &str = "pr_changed_files";
pub const TIME_TO_FIRST_REVIEW_SECS: &str = "pr_time_to_first_review_secs";

pub struct DiscussionExtractor;

impl FeatureExtractor for DiscussionExtractor {
    fn id(&self) -> &str {
        "discussion"
    }

    fn group(&self) -> &str {
        "discussion"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            COMMENT_COUNT.to_string(),
            REVIEW_COUNT.to_string(),
            APPROVAL_COUNT.to_string(),
            CHANGED_FILES.to_string(),
            TIME_TO_FIRST_REVIEW_SECS.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::GITHUB_API.to_string()]
    }

    fn priority(&self) -> i32 {
        40
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let client = ctx
            .resource(resource::GITHUB_API)
            .and_then(ResourceHandle::as_github_api)
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "discussion".to_string(),
                input: resource::GITHUB_API.to_string(),
            })?;

        let data = client
            .discussion(&ctx.repo, &ctx.build)
            .map_err(|e| ExtractError::Failed {
                extractor: "discussion".to_string(),
                message: e.to_string(),
            })?;

        let mut features = FxHashMap::default();
        features.insert(COMMENT_COUNT.to_string(), data.comment_count.into());
        features.insert(REVIEW_COUNT.to_string(), data.review_count.into());
        features.insert(APPROVAL_COUNT.to_string(), data.approval_count.into());
        features.insert(CHANGED_FILES.to_string(), data.changed_files.into());
        features.insert(
            TIME_TO_FIRST_REVIEW_SECS.to_string(),
            data.time_to_first_review_secs
                .map(|s| FeatureValue::Int(s as i64))
                .unwrap_or(FeatureValue::Null),
        );
        Ok(features)
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (COMMENT_COUNT, FeatureValue::Int(0)),
            (REVIEW_COUNT, FeatureValue::Int(0)),
            (APPROVAL_COUNT, FeatureValue::Int(0)),
            (CHANGED_FILES, FeatureValue::Int(0)),
            (TIME_TO_FIRST_REVIEW_SECS, FeatureValue::Null),
        ])
    }
}
