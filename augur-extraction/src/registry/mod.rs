//! Feature registry — the immutable catalog of extractors.
//!
//! Built once at process start via `FeatureRegistry::build` and injected
//! into the resolver and executor; never mutated per-request and never
//! reached through ambient global state.

pub mod catalog;

use std::sync::Arc;

use augur_core::errors::RegistryError;
use augur_core::types::collections::{FxHashMap, FxHashSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::extractors::FeatureExtractor;
use crate::resources::ResourceCatalog;

pub use catalog::CatalogEntry;

/// Immutable catalog mapping feature names to their providing extractors.
pub struct FeatureRegistry {
    extractors: Vec<Arc<dyn FeatureExtractor>>,
    provider_of: FxHashMap<String, usize>,
    disabled_groups: FxHashSet<String>,
}

impl FeatureRegistry {
    /// Validate and build the registry from the full extractor list.
    ///
    /// Fails when a feature has two providers, a required feature has no
    /// provider, a required resource is not in the catalog, or the
    /// provider-level dependency graph has a cycle. All of these are
    /// configuration errors: the process must not serve extraction requests
    /// with an invalid registry.
    pub fn build(
        extractors: Vec<Arc<dyn FeatureExtractor>>,
        resources: &ResourceCatalog,
    ) -> Result<Self, RegistryError> {
        let mut provider_of: FxHashMap<String, usize> = FxHashMap::default();

        for (idx, extractor) in extractors.iter().enumerate() {
            for feature in extractor.provides() {
                if let Some(&existing) = provider_of.get(&feature) {
                    return Err(RegistryError::DuplicateFeature {
                        feature,
                        first: extractors[existing].id().to_string(),
                        second: extractor.id().to_string(),
                    });
                }
                provider_of.insert(feature, idx);
            }
        }

        for extractor in &extractors {
            for feature in extractor.requires_features() {
                if !provider_of.contains_key(&feature) {
                    return Err(RegistryError::UnknownFeature {
                        feature,
                        required_by: extractor.id().to_string(),
                    });
                }
            }
            for resource in extractor.requires_resources() {
                if !resources.contains(&resource) {
                    return Err(RegistryError::UnknownResource {
                        resource,
                        required_by: extractor.id().to_string(),
                    });
                }
            }
        }

        let registry = Self {
            extractors,
            provider_of,
            disabled_groups: FxHashSet::default(),
        };
        registry.check_cycles()?;
        Ok(registry)
    }

    /// Mark extractor groups as disabled for `get_all(enabled_only = true)`.
    pub fn with_disabled_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Detect cycles in the provider-level dependency graph.
    fn check_cycles(&self) -> Result<(), RegistryError> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<_> = (0..self.extractors.len())
            .map(|i| graph.add_node(i))
            .collect();

        let mut edges: FxHashSet<(usize, usize)> = FxHashSet::default();
        for (idx, extractor) in self.extractors.iter().enumerate() {
            for feature in extractor.requires_features() {
                let provider = self.provider_of[&feature];
                if edges.insert((provider, idx)) {
                    graph.add_edge(nodes[provider], nodes[idx], ());
                }
            }
        }

        for scc in tarjan_scc(&graph) {
            let cyclic = scc.len() > 1
                || (scc.len() == 1 && graph.contains_edge(scc[0], scc[0]));
            if cyclic {
                let mut ids: Vec<&str> = scc
                    .iter()
                    .map(|n| self.extractors[graph[*n]].id())
                    .collect();
                ids.sort_unstable();
                return Err(RegistryError::CyclicDependency {
                    cycle: ids.join(" -> "),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// All registered extractors, optionally without disabled groups.
    pub fn get_all(&self, enabled_only: bool) -> Vec<&Arc<dyn FeatureExtractor>> {
        self.extractors
            .iter()
            .filter(|e| !enabled_only || !self.disabled_groups.contains(e.group()))
            .collect()
    }

    /// Index of the extractor providing a feature.
    pub fn provider_index(&self, feature: &str) -> Option<usize> {
        self.provider_of.get(feature).copied()
    }

    pub fn extractor(&self, index: usize) -> &Arc<dyn FeatureExtractor> {
        &self.extractors[index]
    }

    /// Every registered feature name, sorted.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.provider_of.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Minimal set of extractors whose `provides` sets cover the request.
    /// Deduplicated, in registration order.
    pub fn resolve_providers(
        &self,
        names: &[String],
    ) -> Result<Vec<Arc<dyn FeatureExtractor>>, RegistryError> {
        let indexes = self.resolve_provider_indexes(names)?;
        Ok(indexes.iter().map(|&i| self.extractors[i].clone()).collect())
    }

    /// Like `resolve_providers`, returning indexes (used by the resolver).
    pub(crate) fn resolve_provider_indexes(
        &self,
        names: &[String],
    ) -> Result<Vec<usize>, RegistryError> {
        let mut seen: FxHashSet<usize> = FxHashSet::default();
        let mut indexes = Vec::new();
        for name in names {
            let idx = self.provider_of.get(name).copied().ok_or_else(|| {
                RegistryError::UnknownFeature {
                    feature: name.clone(),
                    required_by: "<request>".to_string(),
                }
            })?;
            if seen.insert(idx) {
                indexes.push(idx);
            }
        }
        indexes.sort_unstable();
        Ok(indexes)
    }

    /// The exported feature catalog for UI/selection purposes.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        catalog::build_catalog(&self.extractors)
    }
}
