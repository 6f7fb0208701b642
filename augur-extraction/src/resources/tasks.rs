//! Acquisition tasks and the builtin task DAG.
//!
//! The task dependency graph is fixed at process start. It is never built at
//! runtime from arbitrary input, so a cycle in it is a programmer error, not
//! a runtime condition.

use augur_core::errors::RegistryError;
use augur_core::types::collections::{BTreeSet, FxHashMap, SmallVec2};

use super::spec::ResourceCatalog;

/// Well-known acquisition task names.
pub mod names {
    pub const CLONE_REPO: &str = "clone_repo";
    pub const CHECKOUT_WORKTREE: &str = "checkout_worktree";
    pub const FETCH_BUILD_LOGS: &str = "fetch_build_logs";
    pub const AUTHENTICATE_GITHUB: &str = "authenticate_github";
    pub const EXPORT_SCAN_REPORTS: &str = "export_scan_reports";
}

/// One named unit of acquisition work.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: String,
    /// Tasks that must complete before this one may run.
    pub depends_on: SmallVec2<String>,
    /// Resources this task makes available.
    pub produces: SmallVec2<String>,
}

impl TaskSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            depends_on: SmallVec2::new(),
            produces: SmallVec2::new(),
        }
    }

    pub fn depends(mut self, task: &str) -> Self {
        self.depends_on.push(task.to_string());
        self
    }

    pub fn yields(mut self, resource: &str) -> Self {
        self.produces.push(resource.to_string());
        self
    }
}

/// The fixed acquisition-task DAG.
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    specs: FxHashMap<String, TaskSpec>,
}

impl TaskCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The builtin task DAG shipped with the engine.
    ///
    /// Panics if the builtin definitions ever form a cycle; that is a bug in
    /// this function, caught by the test suite, never by production input.
    pub fn builtin() -> Self {
        use super::spec::names as resource;

        let mut catalog = Self::new();
        catalog.insert(TaskSpec::new(names::CLONE_REPO).yields(resource::GIT_HISTORY));
        catalog.insert(
            TaskSpec::new(names::CHECKOUT_WORKTREE)
                .depends(names::CLONE_REPO)
                .yields(resource::GIT_WORKTREE),
        );
        catalog.insert(TaskSpec::new(names::FETCH_BUILD_LOGS).yields(resource::BUILD_LOGS));
        catalog.insert(TaskSpec::new(names::AUTHENTICATE_GITHUB).yields(resource::GITHUB_API));
        catalog.insert(
            TaskSpec::new(names::EXPORT_SCAN_REPORTS)
                .depends(names::AUTHENTICATE_GITHUB)
                .yields(resource::SCAN_REPORTS),
        );
        catalog
            .validate()
            .expect("builtin task catalog must be acyclic");
        catalog
    }

    pub fn insert(&mut self, spec: TaskSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Check the task dependency graph for cycles.
    pub fn validate(&self) -> Result<(), RegistryError> {
        // Iterative DFS with three-color marking.
        let mut state: FxHashMap<&str, u8> = FxHashMap::default(); // 0 unseen, 1 open, 2 done
        for start in self.specs.keys() {
            if state.get(start.as_str()).copied().unwrap_or(0) != 0 {
                continue;
            }
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            state.insert(start.as_str(), 1);
            while let Some((task, next_dep)) = stack.pop() {
                let deps = self
                    .specs
                    .get(task)
                    .map(|s| s.depends_on.as_slice())
                    .unwrap_or(&[]);
                if next_dep < deps.len() {
                    stack.push((task, next_dep + 1));
                    let dep = deps[next_dep].as_str();
                    match state.get(dep).copied().unwrap_or(0) {
                        0 => {
                            state.insert(dep, 1);
                            stack.push((dep, 0));
                        }
                        1 => {
                            return Err(RegistryError::CyclicDependency {
                                cycle: format!("{task} -> {dep}"),
                            });
                        }
                        _ => {}
                    }
                } else {
                    state.insert(task, 2);
                }
            }
        }
        Ok(())
    }

    /// The tasks needed to acquire a set of resources: each resource's
    /// acquisition tasks plus the transitive closure of task dependencies.
    pub fn tasks_for_resources(
        &self,
        resources: &BTreeSet<String>,
        catalog: &ResourceCatalog,
    ) -> BTreeSet<String> {
        let mut needed: BTreeSet<String> = BTreeSet::new();
        let mut frontier: Vec<String> = Vec::new();
        for resource in resources {
            if let Some(spec) = catalog.get(resource) {
                frontier.extend(spec.tasks.iter().cloned());
            }
        }
        while let Some(task) = frontier.pop() {
            if !needed.insert(task.clone()) {
                continue;
            }
            if let Some(spec) = self.specs.get(&task) {
                for dep in &spec.depends_on {
                    if !needed.contains(dep) {
                        frontier.push(dep.clone());
                    }
                }
            }
        }
        needed
    }
}
