//! Storage-layer errors for SQLite operations.

use super::error_code::{self, RidewatchErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("invalid stored value in {table}.{column}: {value}")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

impl RidewatchErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::SqliteError { .. } | Self::InvalidValue { .. } => error_code::STORAGE_ERROR,
        }
    }
}
