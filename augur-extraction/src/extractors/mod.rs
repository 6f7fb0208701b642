//! Extractor units — 8 groups, each a pluggable module.
//!
//! Each extractor implements the `FeatureExtractor` trait and is registered
//! in the `FeatureRegistry` at process start. The framework puts no
//! constraint on what an extractor computes; these are the units shipped
//! with the engine.

pub mod codebase;
pub mod commit;
pub mod derived;
pub mod discussion;
pub mod history;
pub mod logs;
pub mod scan;
pub mod traits;
pub mod workflow;

use std::sync::Arc;

pub use traits::{empty_map, FeatureExtractor};

/// The full builtin extractor list, in group order.
///
/// Registration order is irrelevant to plan output — ordering ties are
/// broken by priority and feature name, never by position in this list.
pub fn builtin() -> Vec<Arc<dyn FeatureExtractor>> {
    vec![
        Arc::new(commit::CommitExtractor),
        Arc::new(history::HistoryExtractor),
        Arc::new(workflow::WorkflowExtractor),
        Arc::new(logs::LogsExtractor),
        Arc::new(codebase::CodebaseExtractor),
        Arc::new(discussion::DiscussionExtractor),
        Arc::new(scan::ScanExtractor),
        Arc::new(derived::DerivedExtractor),
    ]
}
