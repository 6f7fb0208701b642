//! Dependency resolver — turns a requested feature set into an execution
//! plan: level-ordered acquisition tasks plus a topologically ordered list
//! of extractor invocations.

pub mod feature_plan;
pub mod resource_plan;

use std::sync::Arc;

use augur_core::errors::RegistryError;
use augur_core::types::collections::{BTreeSet, FxHashSet};

use crate::extractors::FeatureExtractor;
use crate::registry::FeatureRegistry;
use crate::resources::{ResourceCatalog, TaskCatalog};

pub use resource_plan::ResourcePlan;

/// The complete plan for one extraction run.
pub struct ExtractionPlan {
    /// Extractors in invocation order: every required upstream feature is
    /// produced by an earlier entry.
    pub extractors: Vec<Arc<dyn FeatureExtractor>>,
    /// Acquisition tasks grouped into parallelizable levels.
    pub resource_plan: ResourcePlan,
}

impl ExtractionPlan {
    /// Feature names the plan will attempt to produce, in extractor order.
    pub fn planned_features(&self) -> Vec<String> {
        self.extractors.iter().flat_map(|e| e.provides()).collect()
    }
}

/// Computes extraction plans against an immutable registry and the fixed
/// resource/task catalogs.
pub struct Resolver<'a> {
    registry: &'a FeatureRegistry,
    resources: &'a ResourceCatalog,
    tasks: &'a TaskCatalog,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a FeatureRegistry,
        resources: &'a ResourceCatalog,
        tasks: &'a TaskCatalog,
    ) -> Self {
        Self {
            registry,
            resources,
            tasks,
        }
    }

    /// Resolve a requested feature set into a plan.
    ///
    /// Resolving the same request twice yields identical plans: level
    /// membership, in-level order, and extractor order are all stable.
    pub fn plan(&self, requested: &[String]) -> Result<ExtractionPlan, RegistryError> {
        let selected = self.select_closure(requested)?;
        let extractors = feature_plan::order(self.registry, &selected)?;

        let direct: BTreeSet<String> = extractors
            .iter()
            .flat_map(|e| e.requires_resources())
            .collect();
        let required = self
            .resources
            .required_closure(direct.iter().map(String::as_str));
        let resource_plan = resource_plan::level(&required, self.resources, self.tasks)?;

        Ok(ExtractionPlan {
            extractors,
            resource_plan,
        })
    }

    /// Providers of the requested features plus, transitively, providers of
    /// every upstream feature they require.
    fn select_closure(&self, requested: &[String]) -> Result<FxHashSet<usize>, RegistryError> {
        let mut selected: FxHashSet<usize> = FxHashSet::default();
        let mut frontier = self.registry.resolve_provider_indexes(requested)?;

        while let Some(idx) = frontier.pop() {
            if !selected.insert(idx) {
                continue;
            }
            for feature in self.registry.extractor(idx).requires_features() {
                // Validated at registry build time; missing here would be a
                // registry bug, surfaced as UnknownFeature all the same.
                let provider = self.registry.provider_index(&feature).ok_or_else(|| {
                    RegistryError::UnknownFeature {
                        feature: feature.clone(),
                        required_by: self.registry.extractor(idx).id().to_string(),
                    }
                })?;
                if !selected.contains(&provider) {
                    frontier.push(provider);
                }
            }
        }
        Ok(selected)
    }
}
