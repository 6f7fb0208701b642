//! The event handler trait.

use super::types::*;

/// Receives extraction lifecycle events.
///
/// All methods have empty default bodies, so handlers implement only the
/// events they care about.
pub trait ExtractionEventHandler: Send + Sync {
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_resource_acquired(&self, _event: &ResourceAcquiredEvent) {}
    fn on_resource_failed(&self, _event: &ResourceFailedEvent) {}
    fn on_extractor_failed(&self, _event: &ExtractorFailedEvent) {}
    fn on_features_skipped(&self, _event: &FeaturesSkippedEvent) {}
    fn on_run_complete(&self, _event: &RunCompleteEvent) {}
    fn on_vector_persisted(&self, _event: &VectorPersistedEvent) {}
}
