//! EventDispatcher — synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::ExtractionEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec —
/// effectively zero cost.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ExtractionEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ExtractionEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn ExtractionEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::error!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_run_started(&self, event: &RunStartedEvent) {
        self.emit(|h| h.on_run_started(event));
    }

    pub fn emit_resource_acquired(&self, event: &ResourceAcquiredEvent) {
        self.emit(|h| h.on_resource_acquired(event));
    }

    pub fn emit_resource_failed(&self, event: &ResourceFailedEvent) {
        self.emit(|h| h.on_resource_failed(event));
    }

    pub fn emit_extractor_failed(&self, event: &ExtractorFailedEvent) {
        self.emit(|h| h.on_extractor_failed(event));
    }

    pub fn emit_features_skipped(&self, event: &FeaturesSkippedEvent) {
        self.emit(|h| h.on_features_skipped(event));
    }

    pub fn emit_run_complete(&self, event: &RunCompleteEvent) {
        self.emit(|h| h.on_run_complete(event));
    }

    pub fn emit_vector_persisted(&self, event: &VectorPersistedEvent) {
        self.emit(|h| h.on_vector_persisted(event));
    }
}
