//! History extractor — recent activity of the repository and of the build's
//! author.

use augur_core::errors::ExtractError;
use augur_core::types::collections::{FxHashMap, FxHashSet};
use augur_core::types::FeatureValue;

use super::traits::{empty_map, FeatureExtractor};
use crate::context::ExecutionContext;
use crate::resources::handle::ResourceHandle;
use crate::resources::spec::names as resource;

pub const COMMIT_COUNT: &str = "history_commit_count";
pub const AUTHOR_COUNT: &str = "history_author_count";
pub const AUTHOR_COMMIT_SHARE: &str = "history_author_commit_share";

/// How far back the revwalk looks from the build's head commit.
const RECENT_WINDOW: usize = 500;

pub struct HistoryExtractor;

impl HistoryExtractor {
    fn fail(message: String) -> ExtractError {
        ExtractError::Failed {
            extractor: "history".to_string(),
            message,
        }
    }
}

impl FeatureExtractor for HistoryExtractor {
    fn id(&self) -> &str {
        "history"
    }

    fn group(&self) -> &str {
        "history"
    }

    fn provides(&self) -> Vec<String> {
        vec![
            COMMIT_COUNT.to_string(),
            AUTHOR_COUNT.to_string(),
            AUTHOR_COMMIT_SHARE.to_string(),
        ]
    }

    fn requires_resources(&self) -> Vec<String> {
        vec![resource::GIT_HISTORY.to_string()]
    }

    fn priority(&self) -> i32 {
        70
    }

    fn extract(
        &self,
        ctx: &ExecutionContext,
    ) -> Result<FxHashMap<String, FeatureValue>, ExtractError> {
        let history = ctx
            .resource(resource::GIT_HISTORY)
            .and_then(ResourceHandle::as_git_history)
            .ok_or_else(|| ExtractError::MissingInput {
                extractor: "history".to_string(),
                input: resource::GIT_HISTORY.to_string(),
            })?;

        let actor = ctx.build.actor.as_deref();

        history.with_repo(|repo| {
            let oid = git2::Oid::from_str(&ctx.build.head_sha)
                .map_err(|e| Self::fail(format!("bad head sha: {}", e.message())))?;
            let mut walk = repo
                .revwalk()
                .map_err(|e| Self::fail(format!("revwalk: {}", e.message())))?;
            walk.push(oid)
                .map_err(|e| Self::fail(format!("revwalk push: {}", e.message())))?;

            let mut commit_count: i64 = 0;
            let mut authors: FxHashSet<String> = FxHashSet::default();
            let mut actor_commits: i64 = 0;

            for entry in walk.take(RECENT_WINDOW) {
                let oid = entry.map_err(|e| Self::fail(format!("revwalk: {}", e.message())))?;
                let commit = repo
                    .find_commit(oid)
                    .map_err(|e| Self::fail(format!("find commit: {}", e.message())))?;
                commit_count += 1;

                let author = commit.author();
                let email = author.email().unwrap_or("").to_string();
                let name = author.name().unwrap_or("").to_string();
                if let Some(actor) = actor {
                    if name == actor || email.split('@').next() == Some(actor) {
                        actor_commits += 1;
                    }
                }
                authors.insert(if email.is_empty() { name } else { email });
            }

            let share = if commit_count > 0 {
                actor_commits as f64 / commit_count as f64
            } else {
                0.0
            };

            let mut features = FxHashMap::default();
            features.insert(COMMIT_COUNT.to_string(), commit_count.into());
            features.insert(AUTHOR_COUNT.to_string(), authors.len().into());
            features.insert(AUTHOR_COMMIT_SHARE.to_string(), share.into());
            Ok(features)
        })
    }

    fn empty_values(&self) -> FxHashMap<String, FeatureValue> {
        empty_map(&[
            (COMMIT_COUNT, FeatureValue::Int(0)),
            (AUTHOR_COUNT, FeatureValue::Int(0)),
            (AUTHOR_COMMIT_SHARE, FeatureValue::Float(0.0)),
        ])
    }
}
