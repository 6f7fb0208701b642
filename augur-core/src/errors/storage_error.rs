//! Storage errors.

use super::error_code::{self, AugurErrorCode};

/// Errors from the SQLite persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("database busy")]
    DbBusy,

    #[error("serialization failed: {message}")]
    Serialization { message: String },

    #[error("migration v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },
}

impl AugurErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
