//! Execution context — per-run scratch space for resources and features.

use std::path::PathBuf;

use augur_core::types::collections::FxHashMap;
use augur_core::types::{BuildRef, FeatureValue, RepoRef};

use crate::resources::handle::{RepoSettings, ResourceHandle};
use crate::resources::spec::names;

/// Mutable state owned by a single extraction run.
///
/// Created fresh per run, discarded afterwards. Resources land here as
/// acquisition tasks complete; features land here as extractors complete.
/// Feature insertion is first-write-wins, which makes merge idempotent:
/// values supplied up front (from a previous run) are never overwritten.
pub struct ExecutionContext {
    pub repo: RepoRef,
    pub build: BuildRef,
    /// Scratch directory for run-scoped on-disk resources (worktrees).
    pub workdir: PathBuf,
    resources: FxHashMap<String, ResourceHandle>,
    features: FxHashMap<String, FeatureValue>,
    /// Resource names in acquisition order; cleanup runs in reverse.
    acquired: Vec<String>,
}

impl ExecutionContext {
    /// Create a context with the core resources (`repo`, `repo_config`)
    /// seeded.
    pub fn new(repo: RepoRef, build: BuildRef, settings: RepoSettings, workdir: PathBuf) -> Self {
        let mut resources = FxHashMap::default();
        resources.insert(
            names::REPO.to_string(),
            ResourceHandle::RepoMeta(repo.clone()),
        );
        resources.insert(
            names::REPO_CONFIG.to_string(),
            ResourceHandle::RepoConfig(settings),
        );
        Self {
            repo,
            build,
            workdir,
            resources,
            features: FxHashMap::default(),
            acquired: Vec::new(),
        }
    }

    // ---- Resources ----

    /// Record an acquired resource. Core seeds are inserted in `new`; every
    /// handle added here participates in reverse-order cleanup.
    pub fn set_resource(&mut self, name: impl Into<String>, handle: ResourceHandle) {
        let name = name.into();
        if self.resources.insert(name.clone(), handle).is_none() {
            self.acquired.push(name);
        }
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceHandle> {
        self.resources.get(name)
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Acquired (non-core) resources, in acquisition order.
    pub fn acquired_order(&self) -> &[String] {
        &self.acquired
    }

    /// Drop every handle. Called after provider cleanup has run.
    pub fn clear_resources(&mut self) {
        self.resources.clear();
        self.acquired.clear();
    }

    /// The seeded per-repository settings, absent only if the context was
    /// built without core seeds (not possible through `new`).
    pub fn settings(&self) -> Option<&RepoSettings> {
        self.resource(names::REPO_CONFIG)
            .and_then(ResourceHandle::as_repo_config)
    }

    // ---- Features ----

    /// Insert a feature value. Returns false (and leaves the existing value
    /// in place) when the name is already present.
    pub fn insert_feature(&mut self, name: impl Into<String>, value: FeatureValue) -> bool {
        let name = name.into();
        if self.features.contains_key(&name) {
            return false;
        }
        self.features.insert(name, value);
        true
    }

    /// Insert many feature values; returns how many were newly inserted.
    pub fn insert_features(&mut self, values: FxHashMap<String, FeatureValue>) -> usize {
        let mut inserted = 0;
        for (name, value) in values {
            if self.insert_feature(name, value) {
                inserted += 1;
            }
        }
        inserted
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// A previously computed feature, or `default` when absent.
    pub fn feature_or(&self, name: &str, default: FeatureValue) -> FeatureValue {
        self.features.get(name).cloned().unwrap_or(default)
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn features(&self) -> &FxHashMap<String, FeatureValue> {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}
