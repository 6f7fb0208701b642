//! V001: Initial schema — feature_vectors, feature_catalog, extraction_runs.

pub const MIGRATION_SQL: &str = r#"
-- Feature vectors: one row per (repo, build, scope, schema_version).
-- Re-running extraction for the same key overwrites, never duplicates.
CREATE TABLE IF NOT EXISTS feature_vectors (
    repo_id INTEGER NOT NULL,
    build_id INTEGER NOT NULL,
    scope TEXT NOT NULL,
    schema_version TEXT NOT NULL,
    status TEXT NOT NULL,
    features_json TEXT NOT NULL,
    features_hash INTEGER NOT NULL,
    skipped_json TEXT NOT NULL,
    errors_json TEXT NOT NULL,
    succeeded_extractors INTEGER NOT NULL DEFAULT 0,
    failed_extractors INTEGER NOT NULL DEFAULT 0,
    duration_ms INTEGER NOT NULL DEFAULT 0,
    extracted_at INTEGER NOT NULL,
    PRIMARY KEY (repo_id, build_id, scope, schema_version)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_feature_vectors_repo
    ON feature_vectors(repo_id, extracted_at DESC);
CREATE INDEX IF NOT EXISTS idx_feature_vectors_status
    ON feature_vectors(status) WHERE status != 'success';

-- Published feature catalog: replaced wholesale on each publish.
CREATE TABLE IF NOT EXISTS feature_catalog (
    name TEXT PRIMARY KEY,
    group_name TEXT NOT NULL,
    data_type TEXT NOT NULL,
    resources_json TEXT NOT NULL,
    published_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_feature_catalog_group
    ON feature_catalog(group_name);

-- Extraction runs: append-only history.
CREATE TABLE IF NOT EXISTS extraction_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_id INTEGER NOT NULL,
    build_id INTEGER NOT NULL,
    started_at INTEGER NOT NULL,
    completed_at INTEGER,
    status TEXT NOT NULL DEFAULT 'running',
    feature_count INTEGER,
    error_count INTEGER,
    duration_ms INTEGER
) STRICT;

CREATE INDEX IF NOT EXISTS idx_extraction_runs_repo
    ON extraction_runs(repo_id, started_at DESC);
"#;
