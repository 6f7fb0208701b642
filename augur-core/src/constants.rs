//! Process-wide constants.

/// Version tag stamped into every persisted feature vector. Bumped whenever
/// an extractor changes the meaning or set of features it produces, so
/// downstream consumers can tell vectors from different extractor
/// generations apart.
pub const SCHEMA_VERSION: &str = "3";

/// Default extraction scope recorded on feature vectors when the caller does
/// not name one. A (repo, build) pair has at most one vector per scope and
/// schema version.
pub const DEFAULT_SCOPE: &str = "build";

/// Upper bound on acquisition retry attempts, regardless of configuration.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Default number of concurrent acquisition tasks per plan level.
pub const DEFAULT_ACQUISITION_PARALLELISM: usize = 4;
