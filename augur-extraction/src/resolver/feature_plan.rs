//! Feature-level planning: priority-aware topological ordering of the
//! selected extractors.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use augur_core::errors::RegistryError;
use augur_core::types::collections::{FxHashMap, FxHashSet};

use crate::extractors::FeatureExtractor;
use crate::registry::FeatureRegistry;

/// Heap key: higher priority first, then the lexicographically smallest
/// provided feature name. The name tie-break is deliberate — it makes plans
/// independent of the order the extractor list was assembled in.
struct ReadyKey {
    priority: i32,
    name: String,
    index: usize,
}

impl PartialEq for ReadyKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReadyKey {}

impl PartialOrd for ReadyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReadyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the maximum: make higher priority greater, and
        // among equal priorities make the smaller name greater.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.name.cmp(&self.name))
            .then_with(|| other.index.cmp(&self.index))
    }
}

fn ready_key(registry: &FeatureRegistry, index: usize) -> ReadyKey {
    let extractor = registry.extractor(index);
    let name = extractor
        .provides()
        .into_iter()
        .min()
        .unwrap_or_else(|| extractor.id().to_string());
    ReadyKey {
        priority: extractor.priority(),
        name,
        index,
    }
}

/// Order the selected extractors so that every required upstream feature is
/// produced by an earlier entry.
///
/// Cycles are caught at registry build time; this re-checks defensively and
/// reports the extractors left unordered.
pub fn order(
    registry: &FeatureRegistry,
    selected: &FxHashSet<usize>,
) -> Result<Vec<Arc<dyn FeatureExtractor>>, RegistryError> {
    let mut in_degree: FxHashMap<usize, usize> =
        selected.iter().map(|&idx| (idx, 0)).collect();
    let mut dependents: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    let mut edges: FxHashSet<(usize, usize)> = FxHashSet::default();

    for &idx in selected {
        for feature in registry.extractor(idx).requires_features() {
            if let Some(provider) = registry.provider_index(&feature) {
                if selected.contains(&provider) && edges.insert((provider, idx)) {
                    *in_degree.entry(idx).or_insert(0) += 1;
                    dependents.entry(provider).or_default().push(idx);
                }
            }
        }
    }

    let mut ready: BinaryHeap<ReadyKey> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&idx, _)| ready_key(registry, idx))
        .collect();

    let mut ordered = Vec::with_capacity(selected.len());
    while let Some(key) = ready.pop() {
        ordered.push(registry.extractor(key.index).clone());
        for &dependent in dependents.get(&key.index).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(deg) = in_degree.get_mut(&dependent) {
                *deg -= 1;
                if *deg == 0 {
                    ready.push(ready_key(registry, dependent));
                }
            }
        }
    }

    if ordered.len() < selected.len() {
        let mut stuck: Vec<&str> = selected
            .iter()
            .filter(|idx| in_degree.get(idx).copied().unwrap_or(0) > 0)
            .map(|&idx| registry.extractor(idx).id())
            .collect();
        stuck.sort_unstable();
        return Err(RegistryError::CyclicDependency {
            cycle: stuck.join(" -> "),
        });
    }

    Ok(ordered)
}
