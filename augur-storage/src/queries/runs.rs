//! extraction_runs history queries.

use augur_core::errors::StorageError;
use augur_core::types::{BuildId, RepoId};
use rusqlite::{params, Connection};

use super::now_unix;

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Record the start of a run, returning the history row id.
pub fn insert_run(
    conn: &Connection,
    repo_id: RepoId,
    build_id: BuildId,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO extraction_runs (repo_id, build_id, started_at, status)
         VALUES (?1, ?2, ?3, 'running')",
        params![repo_id.raw(), build_id.raw(), now_unix()],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Mark a run complete with its outcome.
pub fn complete_run(
    conn: &Connection,
    run_id: i64,
    status: &str,
    feature_count: usize,
    error_count: usize,
    duration_ms: u64,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE extraction_runs
         SET completed_at = ?2, status = ?3, feature_count = ?4,
             error_count = ?5, duration_ms = ?6
         WHERE id = ?1",
        params![
            run_id,
            now_unix(),
            status,
            feature_count as i64,
            error_count as i64,
            duration_ms as i64,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// One row of run history.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub repo_id: RepoId,
    pub build_id: BuildId,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub status: String,
    pub feature_count: Option<i64>,
    pub error_count: Option<i64>,
    pub duration_ms: Option<i64>,
}

/// Recent runs for a repository, newest first.
pub fn list_runs(
    conn: &Connection,
    repo_id: RepoId,
    limit: usize,
) -> Result<Vec<RunRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, repo_id, build_id, started_at, completed_at, status,
                    feature_count, error_count, duration_ms
             FROM extraction_runs
             WHERE repo_id = ?1
             ORDER BY started_at DESC, id DESC
             LIMIT ?2",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![repo_id.raw(), limit as i64], |row| {
            Ok(RunRecord {
                id: row.get(0)?,
                repo_id: RepoId(row.get(1)?),
                build_id: BuildId(row.get(2)?),
                started_at: row.get(3)?,
                completed_at: row.get(4)?,
                status: row.get(5)?,
                feature_count: row.get(6)?,
                error_count: row.get(7)?,
                duration_ms: row.get(8)?,
            })
        })
        .map_err(sqlite_err)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_err)?);
    }
    Ok(result)
}
