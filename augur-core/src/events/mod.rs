//! Extraction run lifecycle events.
//!
//! Synchronous dispatch, zero overhead with no handlers registered.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ExtractionEventHandler;
pub use types::*;
