//! Property tests for resolver ordering over randomized registries.

mod common;

use std::sync::Arc;

use augur_core::types::collections::FxHashSet;
use augur_extraction::extractors::FeatureExtractor;
use augur_extraction::registry::FeatureRegistry;
use augur_extraction::resolver::Resolver;
use augur_extraction::resources::{ResourceCatalog, TaskCatalog};
use common::StubExtractor;
use proptest::prelude::*;

/// Build a registry of `n` extractors where extractor i provides `f{i}` and
/// may depend on features of lower-numbered extractors — acyclic by
/// construction.
fn arb_registry() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<i32>)> {
    (2usize..10).prop_flat_map(|n| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(0usize..n, 0..3),
            n,
        );
        let priorities = proptest::collection::vec(-10i32..10, n);
        (deps, priorities)
    })
}

fn build_registry(deps: &[Vec<usize>], priorities: &[i32]) -> FeatureRegistry {
    let n = deps.len();
    let extractors: Vec<Arc<dyn FeatureExtractor>> = (0..n)
        .map(|i| {
            let feature = format!("f{i}");
            let requires: Vec<String> = deps[i]
                .iter()
                .filter(|&&d| d < i)
                .map(|d| format!("f{d}"))
                .collect();
            let requires: Vec<&str> = requires.iter().map(String::as_str).collect();
            Arc::new(
                StubExtractor::new(&format!("e{i}"), &[feature.as_str()])
                    .with_features(&requires)
                    .with_priority(priorities[i]),
            ) as Arc<dyn FeatureExtractor>
        })
        .collect();
    FeatureRegistry::build(extractors, &ResourceCatalog::builtin()).unwrap()
}

proptest! {
    #[test]
    fn prop_feature_order_is_topological((deps, priorities) in arb_registry()) {
        let registry = build_registry(&deps, &priorities);
        let resources = ResourceCatalog::builtin();
        let tasks = TaskCatalog::builtin();
        let resolver = Resolver::new(&registry, &resources, &tasks);

        let requested: Vec<String> = (0..deps.len()).map(|i| format!("f{i}")).collect();
        let plan = resolver.plan(&requested).unwrap();

        // Every selected extractor appears exactly once.
        prop_assert_eq!(plan.extractors.len(), deps.len());

        // For every extractor, every required feature was provided earlier.
        let mut produced: FxHashSet<String> = FxHashSet::default();
        for extractor in &plan.extractors {
            for needed in extractor.requires_features() {
                prop_assert!(produced.contains(&needed),
                    "{} ran before its dependency {}", extractor.id(), needed);
            }
            for name in extractor.provides() {
                produced.insert(name);
            }
        }
    }

    #[test]
    fn prop_plan_is_stable((deps, priorities) in arb_registry()) {
        let registry = build_registry(&deps, &priorities);
        let resources = ResourceCatalog::builtin();
        let tasks = TaskCatalog::builtin();
        let resolver = Resolver::new(&registry, &resources, &tasks);

        let requested: Vec<String> = (0..deps.len()).map(|i| format!("f{i}")).collect();
        let first: Vec<String> = resolver
            .plan(&requested)
            .unwrap()
            .extractors
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        let second: Vec<String> = resolver
            .plan(&requested)
            .unwrap()
            .extractors
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_subset_requests_resolve((deps, priorities) in arb_registry(), pick in any::<prop::sample::Index>()) {
        let registry = build_registry(&deps, &priorities);
        let resources = ResourceCatalog::builtin();
        let tasks = TaskCatalog::builtin();
        let resolver = Resolver::new(&registry, &resources, &tasks);

        let target = pick.index(deps.len());
        let requested = vec![format!("f{target}")];
        let plan = resolver.plan(&requested).unwrap();

        // The plan covers the request.
        let provided: FxHashSet<String> = plan
            .extractors
            .iter()
            .flat_map(|e| e.provides())
            .collect();
        let target_feature = format!("f{target}");
        prop_assert!(provided.contains(&target_feature));
    }
}
