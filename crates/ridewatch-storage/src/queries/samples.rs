//! Queries for the position_samples table: append-only log of position reports.

use ridewatch_core::errors::StorageError;
use ridewatch_core::PositionSample;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::to_storage_err;

fn map_row(row: &Row<'_>) -> rusqlite::Result<PositionSample> {
    Ok(PositionSample::new(row.get(0)?, row.get(1)?, row.get(2)?))
}

/// Append a sample. Returns the row id.
pub fn insert_sample(conn: &Connection, sample: &PositionSample) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO position_samples (lat, lng, captured_at) VALUES (?1, ?2, ?3)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            sample.position.latitude,
            sample.position.longitude,
            sample.captured_at
        ])
    })
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// The `limit` most recently inserted samples, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<PositionSample>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT lat, lng, captured_at FROM position_samples ORDER BY id DESC LIMIT ?1",
        )
        .map_err(to_storage_err)?;

    let rows = stmt
        .query_map(params![limit as i64], map_row)
        .map_err(to_storage_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// The most recently inserted sample, if any.
pub fn query_latest(conn: &Connection) -> Result<Option<PositionSample>, StorageError> {
    conn.query_row(
        "SELECT lat, lng, captured_at FROM position_samples ORDER BY id DESC LIMIT 1",
        [],
        map_row,
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM position_samples", [], |row| row.get(0))
        .map_err(to_storage_err)
}
