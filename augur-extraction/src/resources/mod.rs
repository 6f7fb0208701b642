//! Resource model — named external dependencies, the acquisition-task DAG,
//! resource handles, providers, and per-repository locking.

pub mod github;
pub mod handle;
pub mod locks;
pub mod providers;
pub mod spec;
pub mod tasks;

pub use github::{DiscussionData, GithubClient, ScanReport};
pub use handle::{BuildLogs, GitHistory, LogFile, RepoSettings, ResourceHandle, ScanReports, Worktree};
pub use locks::RepoLockTable;
pub use providers::{ProviderSet, ResourceProvider};
pub use spec::{ResourceCatalog, ResourceKind, ResourceSpec};
pub use tasks::{TaskCatalog, TaskSpec};
