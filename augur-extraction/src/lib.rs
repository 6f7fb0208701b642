//! # augur-extraction
//!
//! The Augur extraction engine. Builds per-build feature vectors from CI/CD
//! metadata through a registry-driven pipeline: a fixed resource/acquisition
//! DAG, an immutable feature registry, a dependency resolver producing
//! level-ordered acquisition plans and topologically ordered extractor
//! invocations, and an executor with partial-failure tolerance.

pub mod acquire;
pub mod context;
pub mod engine;
pub mod executor;
pub mod extractors;
pub mod registry;
pub mod resolver;
pub mod resources;
pub mod retry;

pub use context::ExecutionContext;
pub use engine::{ExtractionEngine, RunInputs};
pub use executor::{Executor, ExtractionStatus, FeatureVectorResult};
pub use extractors::FeatureExtractor;
pub use registry::{CatalogEntry, FeatureRegistry};
pub use resolver::{ExtractionPlan, Resolver, ResourcePlan};
pub use retry::RetryPolicy;
