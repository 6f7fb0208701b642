//! Executor — drives extractors in resolved order with partial-failure
//! tolerance.
//!
//! One extractor's failure never aborts the run: the failure is recorded,
//! the extractor's declared defaults are filled in, and execution continues.
//! Extraction within a run is strictly sequential; the context is not
//! shared between threads here.

pub mod result;

use std::sync::Arc;
use std::time::Instant;

use augur_core::errors::{AugurErrorCode, ExecutorError};
use augur_core::events::{EventDispatcher, ExtractorFailedEvent, FeaturesSkippedEvent};
use augur_core::types::collections::FxHashSet;

use crate::acquire::AcquisitionReport;
use crate::context::ExecutionContext;
use crate::extractors::FeatureExtractor;
use crate::resolver::ExtractionPlan;
use crate::resources::{ResourceCatalog, ResourceKind};

pub use result::{ErrorEntry, ExtractionStatus, FeatureVectorResult, SkipReason, SkippedFeature};

/// Group label used for acquisition failures in result error entries.
const ACQUISITION_GROUP: &str = "acquisition";

pub struct Executor {
    resources: ResourceCatalog,
    events: Arc<EventDispatcher>,
}

impl Executor {
    pub fn new(resources: ResourceCatalog, events: Arc<EventDispatcher>) -> Self {
        Self { resources, events }
    }

    /// Run the planned extractors against the context and merge their
    /// outputs into a single feature vector.
    ///
    /// Acquisition failures from `acquisition` are carried into the result's
    /// error entries so a vector degraded by a missing resource names the
    /// resource that caused it.
    pub fn run(
        &self,
        ctx: &mut ExecutionContext,
        plan: &ExtractionPlan,
        acquisition: &AcquisitionReport,
        scope: &str,
    ) -> Result<FeatureVectorResult, ExecutorError> {
        let started = Instant::now();
        let mut result = FeatureVectorResult::new(ctx.repo.id, ctx.build.id, scope);

        for failure in &acquisition.failed {
            result.errors.push(ErrorEntry {
                group: ACQUISITION_GROUP.to_string(),
                source: failure.task.clone(),
                message: failure.message.clone(),
            });
        }

        // Features filled with declared defaults after a failure or skip.
        let mut defaulted: FxHashSet<String> = FxHashSet::default();
        let attempted = plan.extractors.len();

        for extractor in &plan.extractors {
            if let Some(missing) = self.missing_resource(ctx, extractor.as_ref())? {
                self.skip(
                    ctx,
                    &mut result,
                    &mut defaulted,
                    extractor.as_ref(),
                    SkipReason::MissingResource,
                );
                tracing::debug!(
                    extractor = extractor.id(),
                    resource = %missing,
                    "skipping extractor, resource missing"
                );
                continue;
            }

            if !extractor.run_degraded()
                && extractor
                    .requires_features()
                    .iter()
                    .any(|f| defaulted.contains(f))
            {
                self.skip(
                    ctx,
                    &mut result,
                    &mut defaulted,
                    extractor.as_ref(),
                    SkipReason::DegradedUpstream,
                );
                continue;
            }

            match extractor.extract(ctx) {
                Ok(values) => {
                    for (name, value) in values {
                        if ctx.insert_feature(name.clone(), value.clone()) {
                            result.features.insert(name, value);
                        } else if let Some(existing) = ctx.feature(&name) {
                            // First write wins: a value supplied up front is
                            // kept, not overwritten.
                            result.features.insert(name, existing.clone());
                        }
                    }
                    result.succeeded_extractors += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        extractor = extractor.id(),
                        group = extractor.group(),
                        "extractor failed: {e}"
                    );
                    self.events.emit_extractor_failed(&ExtractorFailedEvent {
                        extractor: extractor.id().to_string(),
                        group: extractor.group().to_string(),
                        message: e.to_string(),
                    });
                    result.errors.push(ErrorEntry {
                        group: extractor.group().to_string(),
                        source: extractor.id().to_string(),
                        message: e.log_string(),
                    });
                    result.failed_extractors += 1;
                    self.fill_defaults(ctx, &mut result, &mut defaulted, extractor.as_ref());
                }
            }
        }

        result.status = if attempted > 0 && result.succeeded_extractors == 0 {
            ExtractionStatus::Failed
        } else if result.errors.is_empty() && result.skipped.is_empty() {
            ExtractionStatus::Success
        } else {
            ExtractionStatus::Partial
        };
        result.duration_ms = started.elapsed().as_millis() as u64;

        Ok(result)
    }

    /// First missing required resource, if any. A missing `Core` resource is
    /// a systemic bug — the context seeds them — and raises instead.
    fn missing_resource(
        &self,
        ctx: &ExecutionContext,
        extractor: &dyn FeatureExtractor,
    ) -> Result<Option<String>, ExecutorError> {
        for resource in extractor.requires_resources() {
            if ctx.has_resource(&resource) {
                continue;
            }
            if self.resources.kind(&resource) == Some(ResourceKind::Core) {
                return Err(ExecutorError::MissingCoreResource {
                    resource,
                    extractor: extractor.id().to_string(),
                });
            }
            return Ok(Some(resource));
        }
        Ok(None)
    }

    fn skip(
        &self,
        ctx: &mut ExecutionContext,
        result: &mut FeatureVectorResult,
        defaulted: &mut FxHashSet<String>,
        extractor: &dyn FeatureExtractor,
        reason: SkipReason,
    ) {
        let provides = extractor.provides();
        self.events.emit_features_skipped(&FeaturesSkippedEvent {
            extractor: extractor.id().to_string(),
            reason: reason.as_str().to_string(),
            count: provides.len(),
        });
        for feature in provides {
            result.skipped.push(SkippedFeature {
                feature,
                extractor: extractor.id().to_string(),
                reason,
            });
        }
        self.fill_defaults(ctx, result, defaulted, extractor);
    }

    /// Record the extractor's declared defaults for every provided feature
    /// not already present, so downstream extractors never see an absent
    /// key.
    fn fill_defaults(
        &self,
        ctx: &mut ExecutionContext,
        result: &mut FeatureVectorResult,
        defaulted: &mut FxHashSet<String>,
        extractor: &dyn FeatureExtractor,
    ) {
        for (name, value) in extractor.empty_values() {
            if ctx.insert_feature(name.clone(), value.clone()) {
                result.features.insert(name.clone(), value);
                defaulted.insert(name);
            } else if let Some(existing) = ctx.feature(&name) {
                // Pre-supplied value: real data, not a default.
                result.features.insert(name, existing.clone());
            }
        }
    }
}
