//! Provider for the per-build checkout (`git_worktree`).

use augur_core::errors::ResourceError;

use super::ResourceProvider;
use crate::context::ExecutionContext;
use crate::resources::handle::{ResourceHandle, Worktree};
use crate::resources::spec::names;

/// Checks out the build's head commit into a run-scoped directory.
/// Requires `git_history` to be acquired first.
#[derive(Default)]
pub struct WorktreeProvider;

impl WorktreeProvider {
    pub fn new() -> Self {
        Self
    }

    fn init_failed(message: String) -> ResourceError {
        ResourceError::InitializationFailed {
            resource: names::GIT_WORKTREE.to_string(),
            message,
        }
    }
}

impl ResourceProvider for WorktreeProvider {
    fn resource(&self) -> &str {
        names::GIT_WORKTREE
    }

    fn initialize(&self, ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError> {
        let history = ctx
            .resource(names::GIT_HISTORY)
            .and_then(ResourceHandle::as_git_history)
            .ok_or_else(|| ResourceError::Unavailable {
                resource: names::GIT_HISTORY.to_string(),
            })?;

        let worktree_path = ctx.workdir.join(format!("worktree-{}", ctx.build.id));
        std::fs::create_dir_all(&worktree_path)
            .map_err(|e| Self::init_failed(format!("create worktree dir: {e}")))?;

        history.with_repo(|repo| {
            let oid = git2::Oid::from_str(&ctx.build.head_sha)
                .map_err(|e| Self::init_failed(format!("bad head sha: {}", e.message())))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| Self::init_failed(format!("find commit: {}", e.message())))?;
            let tree = commit
                .tree()
                .map_err(|e| Self::init_failed(format!("commit tree: {}", e.message())))?;
            let mut checkout = git2::build::CheckoutBuilder::new();
            checkout.target_dir(&worktree_path).force();
            repo.checkout_tree(tree.as_object(), Some(&mut checkout))
                .map_err(|e| Self::init_failed(format!("checkout: {}", e.message())))
        })?;

        Ok(ResourceHandle::Worktree(Worktree {
            path: worktree_path,
            commit: ctx.build.head_sha.clone(),
        }))
    }

    fn cleanup(&self, ctx: &ExecutionContext) {
        if let Some(worktree) = ctx
            .resource(names::GIT_WORKTREE)
            .and_then(ResourceHandle::as_worktree)
        {
            if let Err(e) = std::fs::remove_dir_all(&worktree.path) {
                tracing::warn!(
                    path = %worktree.path.display(),
                    "failed to remove worktree: {e}"
                );
            }
        }
    }
}
