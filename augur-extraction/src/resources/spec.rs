//! Resource specifications and the builtin resource catalog.

use augur_core::types::collections::{BTreeSet, FxHashMap, SmallVec2};

/// Well-known resource names.
pub mod names {
    /// Repository metadata (core, seeded into every context).
    pub const REPO: &str = "repo";
    /// Per-repository extraction settings, including the workflow definition.
    pub const REPO_CONFIG: &str = "repo_config";
    /// Shared on-disk clone of the repository.
    pub const GIT_HISTORY: &str = "git_history";
    /// Checkout of the build's head commit.
    pub const GIT_WORKTREE: &str = "git_worktree";
    /// Step logs of the build.
    pub const BUILD_LOGS: &str = "build_logs";
    /// Authenticated GitHub API client.
    pub const GITHUB_API: &str = "github_api";
    /// Static-analysis / security scan reports for the build's commit.
    pub const SCAN_REPORTS: &str = "scan_reports";
}

/// How a resource becomes available to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Always available; seeded into the context at creation, never acquired.
    Core,
    /// Must be acquired once per run before first use.
    Acquired,
    /// Backed by an external service, authenticated on demand.
    OnDemand,
}

/// Specification of one named resource.
#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub name: String,
    pub kind: ResourceKind,
    /// Acquisition tasks that must run before the resource is usable.
    pub tasks: SmallVec2<String>,
    /// Prerequisite resources for composite resources
    /// (`git_worktree` requires `git_history`).
    pub requires: SmallVec2<String>,
}

impl ResourceSpec {
    pub fn new(name: &str, kind: ResourceKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            tasks: SmallVec2::new(),
            requires: SmallVec2::new(),
        }
    }

    pub fn with_task(mut self, task: &str) -> Self {
        self.tasks.push(task.to_string());
        self
    }

    pub fn with_requires(mut self, resource: &str) -> Self {
        self.requires.push(resource.to_string());
        self
    }
}

/// The fixed set of resources known to the engine.
///
/// Built once at process start; resolver and registry validation treat it as
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    specs: FxHashMap<String, ResourceSpec>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin resource set shipped with the engine.
    pub fn builtin() -> Self {
        use super::tasks::names as task;

        let mut catalog = Self::new();
        catalog.insert(ResourceSpec::new(names::REPO, ResourceKind::Core));
        catalog.insert(ResourceSpec::new(names::REPO_CONFIG, ResourceKind::Core));
        catalog.insert(
            ResourceSpec::new(names::GIT_HISTORY, ResourceKind::Acquired)
                .with_task(task::CLONE_REPO),
        );
        catalog.insert(
            ResourceSpec::new(names::GIT_WORKTREE, ResourceKind::Acquired)
                .with_task(task::CHECKOUT_WORKTREE)
                .with_requires(names::GIT_HISTORY),
        );
        catalog.insert(
            ResourceSpec::new(names::BUILD_LOGS, ResourceKind::Acquired)
                .with_task(task::FETCH_BUILD_LOGS),
        );
        catalog.insert(
            ResourceSpec::new(names::GITHUB_API, ResourceKind::OnDemand)
                .with_task(task::AUTHENTICATE_GITHUB),
        );
        catalog.insert(
            ResourceSpec::new(names::SCAN_REPORTS, ResourceKind::OnDemand)
                .with_task(task::EXPORT_SCAN_REPORTS)
                .with_requires(names::GITHUB_API),
        );
        catalog
    }

    pub fn insert(&mut self, spec: ResourceSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<ResourceKind> {
        self.specs.get(name).map(|s| s.kind)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Expand a resource set over prerequisite edges.
    ///
    /// Selecting `git_worktree` pulls in `git_history` as well. Unknown
    /// names are ignored here; the registry rejects them at build time.
    pub fn required_closure<'a, I>(&self, names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut closed: BTreeSet<String> = BTreeSet::new();
        let mut frontier: Vec<String> = names.into_iter().map(str::to_string).collect();
        while let Some(name) = frontier.pop() {
            if !closed.insert(name.clone()) {
                continue;
            }
            if let Some(spec) = self.specs.get(&name) {
                for req in &spec.requires {
                    if !closed.contains(req) {
                        frontier.push(req.clone());
                    }
                }
            }
        }
        closed
    }
}
