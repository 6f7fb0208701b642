//! Codebase extractor — size and test footprint of the checked-out tree.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::handle::ResourceHandle;
use crate::resources::spec::names as resource;

pub const FILE_COUNT: &str = "codebase_file_count";
pub const TEST_FILE_COUNT: &str = "codebase_test_file_count";
pub const TOTAL_BYTES: &str = "codebase_total_bytes";

pub struct CodebaseExtractor;

impl FeatureExtractor for CodebaseExtractor {
    fn id(&self) -> &str {
        "codebase"
    }

    fn group(&self) -> &str {
        "codebase"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            FILE_COUNT.to_string(),
            TEST_FILE_COUNT.to_string(),
            TOTAL_BYTES.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::GIT_WORKTREE.to_string()]
    }

    fn priority(&self) -> i32 {
        50
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let worktree = ctx
            .resource(resource::GIT_WORKTREE)
            .and_then(ResourceHandle::as_worktree)
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "codebase".to_string(),
                input: resource::GIT_WORKTREE.to_string(),
            })?;

        let mut file_count: i64 = 0;
        let mut test_file_count: i64 = 0;
        let mut total_bytes: i64 = 0;

        // Gitignore-aware walk; unreadable entries are skipped, not fatal.
        let walk = ignore::WalkBuilder::new(&worktree.path)
            .hidden(false)
            .git_ignore(true)
            .build();
        for entry in walk.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            file_count += 1;
            let path = entry.path().to_string_lossy();
            if path.contains("test") || path.contains("spec") {
                test_file_count += 1;
            }
            if let Ok(meta) = entry.metadata() {
                total_bytes += meta.len() as i64;
            }
        }

        let mut features = FxHashMap::default();
        features.insert(FILE_COUNT.to_string(), file_count.into());
        features.insert(TEST_FILE_COUNT.to_string(), test_file_count.into());
        features.insert(TOTAL_BYTES.to_string(), total_bytes.into());
        Ok(features)
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (FILE_COUNT, FeatureValue::Int(0)),
            (TEST_FILE_COUNT, FeatureValue::Int(0)),
            (TOTAL_BYTES, FeatureValue::Int(0)),
        ])
    }
}
