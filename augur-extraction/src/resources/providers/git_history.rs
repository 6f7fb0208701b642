//! Provider for the shared repository clone (`git_history`).

use std::path::PathBuf;
use std::sync::Arc;

use augur_core::errors::ResourceError;

use super::ResourceProvider;
use crate::context::ExecutionContext;
use crate::resources::handle::{GitHistory, ResourceHandle};
use crate::resources::locks::{clone_lock_file, RepoLockTable};
use crate::resources::spec::names;

/// Clones (or opens) the repository under the shared clone root.
///
/// Concurrent acquisition for the same repository is serialized by the
/// in-process lock table plus a cross-process file lock next to the clone.
pub struct GitHistoryProvider {
    clone_root: PathBuf,
    locks: Arc<RepoLockTable>,
}

impl GitHistoryProvider {
    pub fn new(clone_root: PathBuf, locks: Arc<RepoLockTable>) -> Self {
        Self { clone_root, locks }
    }

    fn init_failed(message: String) -> ResourceError {
        ResourceError::InitializationFailed {
            resource: names::GIT_HISTORY.to_string(),
            message,
        }
    }

    /// Network-class git errors are transient; everything else is permanent.
    fn map_git_error(e: git2::Error) -> ResourceError {
        match e.class() {
            git2::ErrorClass::Net | git2::ErrorClass::Http | git2::ErrorClass::Ssh => {
                ResourceError::Transient {
                    resource: names::GIT_HISTORY.to_string(),
                    message: e.message().to_string(),
                }
            }
            _ => Self::init_failed(e.message().to_string()),
        }
    }
}

impl ResourceProvider for GitHistoryProvider {
    fn resource(&self) -> &str {
        names::GIT_HISTORY
    }

    fn initialize(&self, ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError> {
        let slug_dir = ctx.repo.slug_dir();
        let clone_path = self.clone_root.join(&slug_dir);

        std::fs::create_dir_all(&self.clone_root)
            .map_err(|e| Self::init_failed(format!("create clone root: {e}")))?;

        let entry = self.locks.entry(&ctx.repo.slug)?;
        let _guard = entry.lock().map_err(|_| ResourceError::LockPoisoned {
            repo: ctx.repo.slug.clone(),
        })?;
        let mut file_lock = clone_lock_file(&self.clone_root.join(format!("{slug_dir}.lock")))?;
        let _file_guard = file_lock.write().map_err(|e| {
            Self::init_failed(format!("acquire clone file lock: {e}"))
        })?;

        if clone_path.exists() {
            tracing::debug!(repo = %ctx.repo.slug, "opening existing clone");
            let history = GitHistory::open(clone_path).map_err(Self::map_git_error)?;
            // Refresh the clone when a remote is reachable; an offline or
            // remoteless clone still serves history extraction.
            history.with_repo(|repo| {
                if let Ok(mut remote) = repo.find_remote("origin") {
                    if let Err(e) = remote.fetch(&[ctx.repo.default_branch.as_str()], None, None) {
                        tracing::debug!(repo = %ctx.repo.slug, "fetch skipped: {}", e.message());
                    }
                }
            });
            return Ok(ResourceHandle::GitHistory(history));
        }

        tracing::info!(repo = %ctx.repo.slug, url = %ctx.repo.clone_url, "cloning repository");
        git2::build::RepoBuilder::new()
            .clone(&ctx.repo.clone_url, &clone_path)
            .map_err(Self::map_git_error)?;
        let history = GitHistory::open(clone_path).map_err(Self::map_git_error)?;
        Ok(ResourceHandle::GitHistory(history))
    }

    // The shared clone outlives the run; nothing to release.
}
