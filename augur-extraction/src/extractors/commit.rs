//! Commit extractor — size and shape of the change a build ran against.

use augur_core::errors::ExtractError;
use augur_core::types::collections::FxHashMap;
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::handle::ResourceHandle;
use crate::resources::spec::names as resource;

pub const LINES_ADDED: &str = "commit_lines_added";
pub const LINES_DELETED: &str = "commit_lines_deleted";
pub const FILES_CHANGED: &str = "commit_files_changed";
pub const MESSAGE_LENGTH: &str = "commit_message_length";
pub const TOUCHES_TESTS: &str = "commit_touches_tests";
pub const TOUCHES_CI: &str = "commit_touches_ci";

pub struct CommitExtractor;

impl CommitExtractor {
    fn fail(message: String) -> ExtractError {
        ExtractError::Failed {
            extractor: "commit".to_string(),
            message,
        }
    }
}

impl FeatureExtractor for CommitExtractor {
    fn id(&self) -> &str {
        "commit"
    }

    fn group(&self) -> &str {
        "commit"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            LINES_ADDED.to_string(),
            LINES_DELETED.to_string(),
            FILES_CHANGED.to_string(),
            MESSAGE_LENGTH.to_string(),
            TOUCHES_TESTS.to_string(),
            TOUCHES_CI.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::GIT_HISTORY.to_string()]
    }

    fn priority(&self) -> i32 {
        80
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let history = ctx
            .resource(resource::GIT_HISTORY)
            .and_then(ResourceHandle::as_git_history)
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "commit".to_string(),
                input: resource::GIT_HISTORY.to_string(),
            })?;

        history.with_repo(|repo| {
            let oid = git2::Oid::from_str(&ctx.build.head_sha)
                .map_err(|e| Self::fail(format!("bad head sha: {}", e.message())))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| Self::fail(format!("find commit: {}", e.message())))?;

            let message_length = commit.message().map(str::len).unwrap_or(0);

            let tree = commit
                .tree()
                .map_err(|e| Self::fail(format!("commit tree: {}", e.message())))?;
            // First-parent diff; a root commit diffs against the empty tree.
            let parent_tree = commit.parent(0).ok().and_then(|p| p.tree().ok());
            let diff = repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
                .map_err(|e| Self::fail(format!("diff: {}", e.message())))?;
            let stats = diff
                .stats()
                .map_err(|e| Self::fail(format!("diff stats: {}", e.message())))?;

            let mut touches_tests = false;
            let mut touches_ci = false;
            for delta in diff.deltas() {
                if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                    let p = path.to_string_lossy();
                    if p.contains("test") || p.contains("spec") {
                        touches_tests = true;
                    }
                    if p.starts_with(".github/workflows") || p.contains(".gitlab-ci") {
                        touches_ci = true;
                    }
                }
            }

            let mut features = FxHashMap::default();
            features.insert(LINES_ADDED.to_string(), stats.insertions().into());
            features.insert(LINES_DELETED.to_string(), stats.deletions().into());
            features.insert(FILES_CHANGED.to_string(), stats.files_changed().into());
            features.insert(MESSAGE_LENGTH.to_string(), message_length.into());
            features.insert(TOUCHES_TESTS.to_string(), touches_tests.into());
            features.insert(TOUCHES_CI.to_string(), touches_ci.into());
            Ok(features)
        })
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (LINES_ADDED, FeatureValue::Int(0)),
            (LINES_DELETED, FeatureValue::Int(0)),
            (FILES_CHANGED, FeatureValue::Int(0)),
            (MESSAGE_LENGTH, FeatureValue::Int(0)),
            (TOUCHES_TESTS, FeatureValue::Bool(false)),
            (TOUCHES_CI, FeatureValue::Bool(false)),
        ])
    }
}
