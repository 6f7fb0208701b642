//! Acquired resource handles held by the execution context.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::github::{GithubClient, ScanReport};

/// An acquired resource, keyed by resource name in the execution context.
///
/// A closed enum rather than type-erased storage: extractors downcast via
/// the `as_*` accessors and get `None` (not a panic) on a kind mismatch.
pub enum ResourceHandle {
    RepoMeta(augur_core::types::RepoRef),
    RepoConfig(RepoSettings),
    GitHistory(GitHistory),
    Worktree(Worktree),
    BuildLogs(BuildLogs),
    GithubApi(Arc<dyn GithubClient>),
    ScanReports(ScanReports),
}

impl ResourceHandle {
    pub fn as_repo(&self) -> Option<&augur_core::types::RepoRef> {
        match self {
            Self::RepoMeta(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_repo_config(&self) -> Option<&RepoSettings> {
        match self {
            Self::RepoConfig(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_git_history(&self) -> Option<&GitHistory> {
        match self {
            Self::GitHistory(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_worktree(&self) -> Option<&Worktree> {
        match self {
            Self::Worktree(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_build_logs(&self) -> Option<&BuildLogs> {
        match self {
            Self::BuildLogs(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_github_api(&self) -> Option<&Arc<dyn GithubClient>> {
        match self {
            Self::GithubApi(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_scan_reports(&self) -> Option<&ScanReports> {
        match self {
            Self::ScanReports(r) => Some(r),
            _ => None,
        }
    }
}

/// Per-repository extraction settings, seeded as the `repo_config` core
/// resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoSettings {
    /// Raw workflow definition (GitHub Actions YAML), when known.
    pub workflow_yaml: Option<String>,
    /// Primary language label, when known.
    pub language: Option<String>,
}

/// Handle to the shared on-disk clone.
///
/// `git2::Repository` is not `Sync`, so the handle serializes access through
/// a mutex; extraction is sequential, so the lock is uncontended there.
pub struct GitHistory {
    pub path: PathBuf,
    repo: Mutex<git2::Repository>,
}

impl GitHistory {
    pub fn open(path: PathBuf) -> Result<Self, git2::Error> {
        let repo = git2::Repository::open(&path)?;
        Ok(Self {
            path,
            repo: Mutex::new(repo),
        })
    }

    /// Run `f` with the underlying repository.
    pub fn with_repo<T>(&self, f: impl FnOnce(&git2::Repository) -> T) -> T {
        let guard = self.repo.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

/// Checkout of the build's head commit.
#[derive(Debug, Clone)]
pub struct Worktree {
    pub path: PathBuf,
    pub commit: String,
}

/// One step log of a build.
#[derive(Debug, Clone)]
pub struct LogFile {
    pub name: String,
    pub content: String,
}

/// All step logs fetched for a build.
#[derive(Debug, Clone, Default)]
pub struct BuildLogs {
    pub files: Vec<LogFile>,
}

impl BuildLogs {
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}

/// Scan reports exported for the build's commit.
#[derive(Debug, Clone, Default)]
pub struct ScanReports {
    pub reports: Vec<ScanReport>,
}
