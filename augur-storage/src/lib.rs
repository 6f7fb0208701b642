//! # augur-storage
//!
//! SQLite persistence for the Augur engine: feature vectors (upserted on
//! their uniqueness key), the published feature catalog, and run history.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::DatabaseManager;
