//! Tests for feature vector persistence: migrations, upsert, load.

use augur_core::types::collections::BTreeMap;
use augur_core::types::{BuildId, FeatureValue, RepoId};
use augur_extraction::executor::result::{
    ErrorEntry, ExtractionStatus, FeatureVectorResult, SkipReason, SkippedFeature,
};
use augur_storage::queries::vectors;
use augur_storage::DatabaseManager;

fn sample_vector(repo: i64, build: i64) -> FeatureVectorResult {
    let mut features: BTreeMap<String, FeatureValue> = BTreeMap::new();
    features.insert("tests_run".into(), FeatureValue::Int(12));
    features.insert("tests_failed".into(), FeatureValue::Int(2));
    features.insert("test_failure_rate".into(), FeatureValue::Float(1.0 / 6.0));
    features.insert("branch_is_default".into(), FeatureValue::Bool(true));
    features.insert("pr_time_to_first_review_secs".into(), FeatureValue::Null);

    FeatureVectorResult {
        repo_id: RepoId(repo),
        build_id: BuildId(build),
        scope: "build".into(),
        schema_version: "3".into(),
        status: ExtractionStatus::Partial,
        features,
        skipped: vec![SkippedFeature {
            feature: "scan_critical".into(),
            extractor: "scan".into(),
            reason: SkipReason::MissingResource,
        }],
        errors: vec![ErrorEntry {
            group: "acquisition".into(),
            source: "export_scan_reports".into(),
            message: "[RESOURCE_INIT_FAILED] scanner export failed".into(),
        }],
        succeeded_extractors: 5,
        failed_extractors: 0,
        duration_ms: 840,
    }
}

#[test]
fn test_migrations_apply_once() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let version = db
        .with_writer(|conn| augur_storage::migrations::current_version(conn))
        .unwrap();
    assert_eq!(version, 1);
}

#[test]
fn test_upsert_and_load_round_trip() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let vector = sample_vector(1, 2);

    db.with_writer(|conn| vectors::upsert_vector(conn, &vector))
        .unwrap();

    let loaded = db
        .with_reader(|conn| vectors::get_vector(conn, RepoId(1), BuildId(2), "build", "3"))
        .unwrap()
        .expect("vector present");

    assert_eq!(loaded.status, ExtractionStatus::Partial);
    assert_eq!(loaded.features, vector.features);
    assert_eq!(loaded.skipped.len(), 1);
    assert_eq!(loaded.errors.len(), 1);
    assert_eq!(loaded.succeeded_extractors, 5);
    assert_eq!(loaded.duration_ms, 840);
}

#[test]
fn test_upsert_overwrites_on_key_conflict() {
    // Uniqueness invariant: exactly one vector per
    // (repo, build, scope, schema_version); re-running overwrites.
    let db = DatabaseManager::open_in_memory().unwrap();

    let mut first = sample_vector(1, 2);
    first.status = ExtractionStatus::Failed;
    db.with_writer(|conn| vectors::upsert_vector(conn, &first))
        .unwrap();

    let mut second = sample_vector(1, 2);
    second.status = ExtractionStatus::Success;
    second
        .features
        .insert("tests_run".into(), FeatureValue::Int(99));
    db.with_writer(|conn| vectors::upsert_vector(conn, &second))
        .unwrap();

    let count: i64 = db
        .with_writer(|conn| {
            conn.query_row("SELECT COUNT(*) FROM feature_vectors", [], |row| row.get(0))
                .map_err(|e| augur_core::errors::StorageError::SqliteError {
                    message: e.to_string(),
                })
        })
        .unwrap();
    assert_eq!(count, 1);

    let loaded = db
        .with_reader(|conn| vectors::get_vector(conn, RepoId(1), BuildId(2), "build", "3"))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.status, ExtractionStatus::Success);
    assert_eq!(loaded.features["tests_run"], FeatureValue::Int(99));
}

#[test]
fn test_distinct_scopes_do_not_collide() {
    let db = DatabaseManager::open_in_memory().unwrap();

    let vector = sample_vector(1, 2);
    db.with_writer(|conn| vectors::upsert_vector(conn, &vector))
        .unwrap();

    let mut nightly = sample_vector(1, 2);
    nightly.scope = "nightly".into();
    db.with_writer(|conn| vectors::upsert_vector(conn, &nightly))
        .unwrap();

    let count: i64 = db
        .with_writer(|conn| {
            conn.query_row("SELECT COUNT(*) FROM feature_vectors", [], |row| row.get(0))
                .map_err(|e| augur_core::errors::StorageError::SqliteError {
                    message: e.to_string(),
                })
        })
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_missing_vector_is_none() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let loaded = db
        .with_reader(|conn| vectors::get_vector(conn, RepoId(9), BuildId(9), "build", "3"))
        .unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_list_recent_orders_newest_first() {
    let db = DatabaseManager::open_in_memory().unwrap();
    for build in 1..=3 {
        let vector = sample_vector(7, build);
        db.with_writer(|conn| vectors::upsert_vector(conn, &vector))
            .unwrap();
    }

    let rows = db
        .with_reader(|conn| vectors::list_recent(conn, RepoId(7), 2))
        .unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.repo_id, RepoId(7));
    }
}

#[test]
fn test_on_disk_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("augur.db");

    {
        let db = DatabaseManager::open(&path).unwrap();
        let vector = sample_vector(3, 4);
        db.with_writer(|conn| vectors::upsert_vector(conn, &vector))
            .unwrap();
        db.checkpoint().unwrap();
    }

    let db = DatabaseManager::open(&path).unwrap();
    let loaded = db
        .with_reader(|conn| vectors::get_vector(conn, RepoId(3), BuildId(4), "build", "3"))
        .unwrap();
    assert!(loaded.is_some());
}
