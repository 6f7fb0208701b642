//! Resource-level planning: Kahn-style leveling of the acquisition task DAG.

use augur_core::errors::RegistryError;
use augur_core::types::collections::{BTreeSet, FxHashMap};

use crate::resources::{ResourceCatalog, TaskCatalog};

/// Acquisition tasks grouped into ordered levels.
///
/// Level 0 holds tasks with no dependencies inside the selection; level k
/// holds tasks whose dependencies all sit in levels < k. Tasks within one
/// level are independent by construction and intended to run concurrently;
/// they are sorted by name so the plan is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePlan {
    pub levels: Vec<Vec<String>>,
    /// Resources the plan acquires (requested set closed over prerequisite
    /// resources).
    pub resources: BTreeSet<String>,
}

impl ResourcePlan {
    /// True when nothing needs acquiring — the caller may proceed directly
    /// to extraction against core resources.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Compute the level grouping for the tasks needed by `resources`.
///
/// The induced subgraph of the fixed task DAG is restricted to the needed
/// tasks (each resource's acquisition tasks plus the transitive closure of
/// their dependencies); a task needed by several resources appears exactly
/// once. An empty resource set yields an empty plan.
pub fn level(
    resources: &BTreeSet<String>,
    catalog: &ResourceCatalog,
    tasks: &TaskCatalog,
) -> Result<ResourcePlan, RegistryError> {
    // Core resources need no acquisition; they never contribute tasks.
    let needed = tasks.tasks_for_resources(resources, catalog);
    if needed.is_empty() {
        return Ok(ResourcePlan {
            levels: Vec::new(),
            resources: resources.clone(),
        });
    }

    // In-degree over the induced subgraph.
    let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
    let mut dependents: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for task in &needed {
        in_degree.entry(task.as_str()).or_insert(0);
        if let Some(spec) = tasks.get(task) {
            for dep in &spec.depends_on {
                if needed.contains(dep) {
                    *in_degree.entry(task.as_str()).or_insert(0) += 1;
                    dependents.entry(dep.as_str()).or_default().push(task);
                }
            }
        }
    }

    let mut current: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&task, _)| task)
        .collect();
    current.sort_unstable();

    let mut levels: Vec<Vec<String>> = Vec::new();
    let mut placed = 0;
    while !current.is_empty() {
        placed += current.len();
        let mut next: Vec<&str> = Vec::new();
        for task in &current {
            for &dependent in dependents.get(task).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(deg) = in_degree.get_mut(dependent) {
                    *deg -= 1;
                    if *deg == 0 {
                        next.push(dependent);
                    }
                }
            }
        }
        next.sort_unstable();
        levels.push(current.iter().map(|t| t.to_string()).collect());
        current = next;
    }

    // The builtin catalog is validated acyclic at startup; a stall here
    // means a custom catalog slipped past validation.
    if placed < needed.len() {
        let mut stuck: Vec<&String> = needed
            .iter()
            .filter(|t| in_degree.get(t.as_str()).copied().unwrap_or(0) > 0)
            .collect();
        stuck.sort_unstable();
        return Err(RegistryError::CyclicDependency {
            cycle: stuck
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" -> "),
        });
    }

    Ok(ResourcePlan {
        levels,
        resources: resources.clone(),
    })
}
