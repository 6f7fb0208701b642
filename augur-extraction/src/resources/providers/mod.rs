//! Resource providers — one per resource type.
//!
//! A provider performs the actual I/O of an acquisition task: cloning a
//! repository, checking out a worktree, reading staged logs, authenticating
//! an API client. `initialize` failures wrap the underlying cause in a
//! `ResourceError`; `cleanup` is best-effort and never raises.

pub mod build_logs;
pub mod git_history;
pub mod github_api;
pub mod scan_reports;
pub mod worktree;

use std::sync::Arc;

use augur_core::config::AcquisitionConfig;
use augur_core::errors::ResourceError;
use augur_core::types::collections::FxHashMap;

use super::github::GithubClient;
use super::handle::ResourceHandle;
use super::locks::RepoLockTable;
use crate::context::ExecutionContext;

pub use build_logs::BuildLogsProvider;
pub use git_history::GitHistoryProvider;
pub use github_api::GithubApiProvider;
pub use scan_reports::ScanReportsProvider;
pub use worktree::WorktreeProvider;

/// Acquires and releases one resource type.
pub trait ResourceProvider: Send + Sync {
    /// The resource this provider acquires.
    fn resource(&self) -> &str;

    /// Acquire the resource for the run described by `ctx`.
    fn initialize(&self, ctx: &ExecutionContext) -> Result<ResourceHandle, ResourceError>;

    /// Release whatever `initialize` created. Failures are logged inside the
    /// implementation, never returned: every resource must get its cleanup
    /// chance at run end.
    fn cleanup(&self, _ctx: &ExecutionContext) {}
}

/// Registry of providers keyed by resource name.
#[derive(Default)]
pub struct ProviderSet {
    providers: FxHashMap<String, Arc<dyn ResourceProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin provider set. The GitHub-backed providers are registered
    /// only when a client is supplied.
    pub fn builtin(
        config: &AcquisitionConfig,
        client: Option<Arc<dyn GithubClient>>,
        locks: Arc<RepoLockTable>,
    ) -> Self {
        let mut set = Self::new();
        set.register(Arc::new(GitHistoryProvider::new(config.clone_root(), locks)));
        set.register(Arc::new(WorktreeProvider::new()));
        set.register(Arc::new(BuildLogsProvider::new(config.log_root())));
        if let Some(client) = client {
            set.register(Arc::new(GithubApiProvider::new(client)));
            set.register(Arc::new(ScanReportsProvider::new()));
        }
        set
    }

    pub fn register(&mut self, provider: Arc<dyn ResourceProvider>) {
        self.providers
            .insert(provider.resource().to_string(), provider);
    }

    pub fn for_resource(&self, resource: &str) -> Option<&Arc<dyn ResourceProvider>> {
        self.providers.get(resource)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
