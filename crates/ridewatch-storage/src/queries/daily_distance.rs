//! Queries for the daily_distance table: one mutable rollup row per calendar day.

use chrono::NaiveDate;
use ridewatch_core::constants::DAY_KEY_FORMAT;
use ridewatch_core::errors::StorageError;
use ridewatch_core::DailyDistanceTotal;
use rusqlite::{params, Connection, OptionalExtension};

use crate::to_storage_err;

fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

fn parse_day(raw: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT).map_err(|_| StorageError::InvalidValue {
        table: "daily_distance",
        column: "date",
        value: raw.to_string(),
    })
}

/// Stored total for `date`, if a row exists.
pub fn get_total(conn: &Connection, date: NaiveDate) -> Result<Option<f64>, StorageError> {
    conn.query_row(
        "SELECT distance_km FROM daily_distance WHERE date = ?1",
        params![day_key(date)],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_storage_err)
}

/// Insert or overwrite the total for `date`.
pub fn upsert_total(conn: &Connection, date: NaiveDate, total_km: f64) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO daily_distance (date, distance_km) VALUES (?1, ?2)
         ON CONFLICT(date) DO UPDATE SET distance_km = excluded.distance_km",
    )
    .and_then(|mut stmt| stmt.execute(params![day_key(date), total_km]))
    .map_err(to_storage_err)?;
    Ok(())
}

/// The `limit` most recent days, date descending.
pub fn query_recent(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<DailyDistanceTotal>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT date, distance_km FROM daily_distance ORDER BY date DESC LIMIT ?1",
        )
        .map_err(to_storage_err)?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })
        .map_err(to_storage_err)?;

    let mut totals = Vec::new();
    for row in rows {
        let (date, distance_km) = row.map_err(to_storage_err)?;
        totals.push(DailyDistanceTotal {
            date: parse_day(&date)?,
            distance_km,
        });
    }
    Ok(totals)
}
