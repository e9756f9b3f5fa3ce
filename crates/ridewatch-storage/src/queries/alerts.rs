//! Queries for the motion_alerts table: append-only alert log.

use ridewatch_core::errors::StorageError;
use ridewatch_core::{AlertEvent, AlertReason, Coordinates};
use rusqlite::{params, Connection};

use crate::to_storage_err;

/// Append an alert. Returns the row id.
pub fn insert_alert(
    conn: &Connection,
    latitude: f64,
    longitude: f64,
    reason: AlertReason,
    timestamp: i64,
) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO motion_alerts (lat, lng, reason, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .and_then(|mut stmt| stmt.execute(params![latitude, longitude, reason.as_str(), timestamp]))
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// The `limit` most recent alerts, newest first.
pub fn query_recent(conn: &Connection, limit: usize) -> Result<Vec<AlertEvent>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT lat, lng, reason, created_at FROM motion_alerts ORDER BY id DESC LIMIT ?1",
        )
        .map_err(to_storage_err)?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, f64>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .map_err(to_storage_err)?;

    let mut alerts = Vec::new();
    for row in rows {
        let (lat, lng, reason, timestamp) = row.map_err(to_storage_err)?;
        let reason = reason
            .parse::<AlertReason>()
            .map_err(|_| StorageError::InvalidValue {
                table: "motion_alerts",
                column: "reason",
                value: reason.clone(),
            })?;
        alerts.push(AlertEvent {
            position: Coordinates::new(lat, lng),
            reason,
            timestamp,
        });
    }
    Ok(alerts)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM motion_alerts", [], |row| row.get(0))
        .map_err(to_storage_err)
}
