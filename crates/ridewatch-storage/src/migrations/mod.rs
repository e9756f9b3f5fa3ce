//! Versioned schema migrations tracked in `PRAGMA user_version`.

pub mod v001_initial;

use ridewatch_core::errors::StorageError;
use rusqlite::Connection;

use crate::connection::writer::with_immediate_transaction;
use crate::to_storage_err;

/// Ordered (version, SQL) pairs. Versions are contiguous from 1.
const MIGRATIONS: &[(u32, &str)] = &[(1, v001_initial::MIGRATION_SQL)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

/// Current schema version of the database.
pub fn schema_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_storage_err)
}

/// Apply every migration newer than the database's schema version.
/// Each migration runs in its own transaction together with its version bump.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = schema_version(conn)?;
    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        with_immediate_transaction(conn, |tx| {
            tx.execute_batch(sql)
                .and_then(|_| tx.pragma_update(None, "user_version", version))
                .map_err(|e| StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })
        })?;
        tracing::info!(version, "applied schema migration");
    }
    Ok(())
}
