//! Per-repository mutual exclusion for shared on-disk clones.
//!
//! Two builds of the same repository may be extracted concurrently; both
//! reach for the same clone directory. The in-process table serializes
//! clone/fetch within this process, and an `fd-lock` file lock extends the
//! exclusion across processes sharing the clone root.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use augur_core::errors::ResourceError;
use augur_core::types::collections::FxHashMap;

/// Process-wide table of per-repository locks, keyed by slug.
#[derive(Default)]
pub struct RepoLockTable {
    inner: Mutex<FxHashMap<String, Arc<Mutex<()>>>>,
}

impl RepoLockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock entry for a repository. Callers hold the returned mutex for
    /// the duration of clone/fetch:
    ///
    /// ```ignore
    /// let entry = locks.entry(&repo.slug)?;
    /// let _guard = entry.lock().map_err(|_| ...)?;
    /// ```
    pub fn entry(&self, slug: &str) -> Result<Arc<Mutex<()>>, ResourceError> {
        let mut table = self.inner.lock().map_err(|_| ResourceError::LockPoisoned {
            repo: slug.to_string(),
        })?;
        Ok(table
            .entry(slug.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }
}

/// Open (creating if needed) the cross-process lock file guarding a clone
/// directory. The caller holds the returned lock's write guard while
/// mutating the clone.
pub fn clone_lock_file(path: &Path) -> Result<fd_lock::RwLock<std::fs::File>, ResourceError> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .map_err(|e| ResourceError::InitializationFailed {
            resource: super::spec::names::GIT_HISTORY.to_string(),
            message: format!("open clone lock {}: {e}", path.display()),
        })?;
    Ok(fd_lock::RwLock::new(file))
}
