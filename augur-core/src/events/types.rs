//! Event payload types for the extraction run lifecycle.

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub repo_slug: String,
    pub build_id: i64,
    pub requested_features: usize,
}

/// Payload for `on_resource_acquired`.
#[derive(Debug, Clone)]
pub struct ResourceAcquiredEvent {
    pub resource: String,
    pub task: String,
    pub duration_ms: u64,
}

/// Payload for `on_resource_failed`.
#[derive(Debug, Clone)]
pub struct ResourceFailedEvent {
    pub resource: String,
    pub task: String,
    pub message: String,
}

/// Payload for `on_extractor_failed`.
#[derive(Debug, Clone)]
pub struct ExtractorFailedEvent {
    pub extractor: String,
    pub group: String,
    pub message: String,
}

/// Payload for `on_features_skipped`.
#[derive(Debug, Clone)]
pub struct FeaturesSkippedEvent {
    pub extractor: String,
    pub reason: String,
    pub count: usize,
}

/// Payload for `on_run_complete`.
#[derive(Debug, Clone)]
pub struct RunCompleteEvent {
    pub repo_slug: String,
    pub build_id: i64,
    pub status: String,
    pub feature_count: usize,
    pub error_count: usize,
    pub duration_ms: u64,
}

/// Payload for `on_vector_persisted`.
#[derive(Debug, Clone)]
pub struct VectorPersistedEvent {
    pub repo_id: i64,
    pub build_id: i64,
    pub schema_version: String,
}
