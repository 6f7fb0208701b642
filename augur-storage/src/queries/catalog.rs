//! feature_catalog publish and load queries.

use augur_core::errors::StorageError;
use augur_extraction::registry::CatalogEntry;
use rusqlite::{params, Connection};

use super::now_unix;

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Replace the published catalog wholesale.
///
/// The catalog is derived from the registry, which is immutable per process;
/// a publish happens once per deploy, so replace-all keeps removals simple.
pub fn publish_catalog(conn: &Connection, entries: &[CatalogEntry]) -> Result<(), StorageError> {
    conn.execute("DELETE FROM feature_catalog", [])
        .map_err(sqlite_err)?;

    let now = now_unix();
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO feature_catalog (name, group_name, data_type, resources_json, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(sqlite_err)?;
    for entry in entries {
        let resources_json =
            serde_json::to_string(&entry.resource_dependencies).map_err(|e| {
                StorageError::Serialization {
                    message: e.to_string(),
                }
            })?;
        stmt.execute(params![
            entry.name,
            entry.group,
            entry.data_type,
            resources_json,
            now,
        ])
        .map_err(sqlite_err)?;
    }
    Ok(())
}

/// Load the published catalog, sorted by group then name.
pub fn load_catalog(conn: &Connection) -> Result<Vec<CatalogEntry>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT name, group_name, data_type, resources_json
             FROM feature_catalog
             ORDER BY group_name, name",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut entries = Vec::new();
    for row in rows {
        let (name, group, data_type, resources_json) = row.map_err(sqlite_err)?;
        let resource_dependencies =
            serde_json::from_str(&resources_json).map_err(|e| StorageError::Serialization {
                message: e.to_string(),
            })?;
        entries.push(CatalogEntry {
            name,
            group,
            data_type,
            resource_dependencies,
        });
    }
    Ok(entries)
}
