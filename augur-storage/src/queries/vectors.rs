//! feature_vectors upsert and load queries.

use augur_core::errors::StorageError;
use augur_core::types::{BuildId, RepoId};
use augur_extraction::executor::result::{
    ErrorEntry, ExtractionStatus, FeatureVectorResult, SkippedFeature,
};
use rusqlite::{params, Connection, OptionalExtension};
use xxhash_rust::xxh3::xxh3_64;

use super::now_unix;

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

fn json_err(e: serde_json::Error) -> StorageError {
    StorageError::Serialization {
        message: e.to_string(),
    }
}

fn parse_status(status: &str) -> Result<ExtractionStatus, StorageError> {
    match status {
        "success" => Ok(ExtractionStatus::Success),
        "partial" => Ok(ExtractionStatus::Partial),
        "failed" => Ok(ExtractionStatus::Failed),
        other => Err(StorageError::Serialization {
            message: format!("unknown status '{other}'"),
        }),
    }
}

/// Upsert a feature vector on its uniqueness key
/// (repo_id, build_id, scope, schema_version).
pub fn upsert_vector(conn: &Connection, vector: &FeatureVectorResult) -> Result<(), StorageError> {
    let features_json = serde_json::to_string(&vector.features).map_err(json_err)?;
    let skipped_json = serde_json::to_string(&vector.skipped).map_err(json_err)?;
    let errors_json = serde_json::to_string(&vector.errors).map_err(json_err)?;
    let features_hash = xxh3_64(features_json.as_bytes()) as i64;

    conn.execute(
        "INSERT INTO feature_vectors (
            repo_id, build_id, scope, schema_version, status,
            features_json, features_hash, skipped_json, errors_json,
            succeeded_extractors, failed_extractors, duration_ms, extracted_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(repo_id, build_id, scope, schema_version) DO UPDATE SET
            status = excluded.status,
            features_json = excluded.features_json,
            features_hash = excluded.features_hash,
            skipped_json = excluded.skipped_json,
            errors_json = excluded.errors_json,
            succeeded_extractors = excluded.succeeded_extractors,
            failed_extractors = excluded.failed_extractors,
            duration_ms = excluded.duration_ms,
            extracted_at = excluded.extracted_at",
        params![
            vector.repo_id.raw(),
            vector.build_id.raw(),
            vector.scope,
            vector.schema_version,
            vector.status.as_str(),
            features_json,
            features_hash,
            skipped_json,
            errors_json,
            vector.succeeded_extractors,
            vector.failed_extractors,
            vector.duration_ms as i64,
            now_unix(),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Load a feature vector by its uniqueness key.
pub fn get_vector(
    conn: &Connection,
    repo_id: RepoId,
    build_id: BuildId,
    scope: &str,
    schema_version: &str,
) -> Result<Option<FeatureVectorResult>, StorageError> {
    let row = conn
        .query_row(
            "SELECT status, features_json, skipped_json, errors_json,
                    succeeded_extractors, failed_extractors, duration_ms
             FROM feature_vectors
             WHERE repo_id = ?1 AND build_id = ?2 AND scope = ?3 AND schema_version = ?4",
            params![repo_id.raw(), build_id.raw(), scope, schema_version],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            },
        )
        .optional()
        .map_err(sqlite_err)?;

    let Some((status, features_json, skipped_json, errors_json, succeeded, failed, duration)) = row
    else {
        return Ok(None);
    };

    let features = serde_json::from_str(&features_json).map_err(json_err)?;
    let skipped: Vec<SkippedFeature> = serde_json::from_str(&skipped_json).map_err(json_err)?;
    let errors: Vec<ErrorEntry> = serde_json::from_str(&errors_json).map_err(json_err)?;

    Ok(Some(FeatureVectorResult {
        repo_id,
        build_id,
        scope: scope.to_string(),
        schema_version: schema_version.to_string(),
        status: parse_status(&status)?,
        features,
        skipped,
        errors,
        succeeded_extractors: succeeded,
        failed_extractors: failed,
        duration_ms: duration.max(0) as u64,
    }))
}

/// Summary row for vector listings.
#[derive(Debug, Clone)]
pub struct VectorSummary {
    pub repo_id: RepoId,
    pub build_id: BuildId,
    pub scope: String,
    pub schema_version: String,
    pub status: String,
    pub extracted_at: i64,
}

/// Most recent vectors for a repository, newest first.
pub fn list_recent(
    conn: &Connection,
    repo_id: RepoId,
    limit: usize,
) -> Result<Vec<VectorSummary>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT repo_id, build_id, scope, schema_version, status, extracted_at
             FROM feature_vectors
             WHERE repo_id = ?1
             ORDER BY extracted_at DESC
             LIMIT ?2",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![repo_id.raw(), limit as i64], |row| {
            Ok(VectorSummary {
                repo_id: RepoId(row.get(0)?),
                build_id: BuildId(row.get(1)?),
                scope: row.get(2)?,
                schema_version: row.get(3)?,
                status: row.get(4)?,
                extracted_at: row.get(5)?,
            })
        })
        .map_err(sqlite_err)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_err)?);
    }
    Ok(result)
}
