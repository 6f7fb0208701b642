//! # augur-core
//!
//! Shared foundation for the Augur feature extraction engine: error types,
//! configuration, lifecycle events, tracing setup, identifiers, and the
//! heterogeneous feature value type.

pub mod constants;
pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;
