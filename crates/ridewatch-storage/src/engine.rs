//! RidewatchStorageEngine: owns the DatabaseManager and implements [`PositionStore`].

use std::path::Path;

use chrono::NaiveDate;
use ridewatch_core::config::StorageConfig;
use ridewatch_core::constants::DISTANCE_WINDOW;
use ridewatch_core::errors::StorageError;
use ridewatch_core::geo::distance_km;
use ridewatch_core::{
    AlertEvent, AlertReason, DailyDistanceTotal, PositionSample, PositionStore, SampleRollup,
};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{alerts, daily_distance, samples};

pub struct RidewatchStorageEngine {
    db: DatabaseManager,
}

impl RidewatchStorageEngine {
    /// Open a file-backed engine.
    pub fn open(path: &Path, read_pool_size: usize) -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open(path, read_pool_size)?,
        })
    }

    /// Open the database described by `config`.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        Self::open(&config.effective_db_path(), config.effective_read_pool_size())
    }

    /// Open an in-memory engine (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }
}

impl PositionStore for RidewatchStorageEngine {
    fn append_sample(&self, sample: &PositionSample) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| samples::insert_sample(conn, sample).map(|_| ()))
    }

    fn recent_samples(&self, limit: usize) -> Result<Vec<PositionSample>, StorageError> {
        self.db.with_reader(|conn| samples::query_recent(conn, limit))
    }

    fn latest_sample(&self) -> Result<Option<PositionSample>, StorageError> {
        self.db.with_reader(samples::query_latest)
    }

    fn daily_total(&self, date: NaiveDate) -> Result<Option<f64>, StorageError> {
        self.db.with_reader(|conn| daily_distance::get_total(conn, date))
    }

    fn upsert_daily_total(&self, date: NaiveDate, total_km: f64) -> Result<(), StorageError> {
        self.db
            .with_writer(|conn| daily_distance::upsert_total(conn, date, total_km))
    }

    fn recent_daily_totals(&self, limit: usize) -> Result<Vec<DailyDistanceTotal>, StorageError> {
        self.db
            .with_reader(|conn| daily_distance::query_recent(conn, limit))
    }

    fn record_sample(
        &self,
        sample: &PositionSample,
        date: NaiveDate,
    ) -> Result<SampleRollup, StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                samples::insert_sample(tx, sample)?;

                // Measured between the two newest rows, read inside the same transaction.
                let recent = samples::query_recent(tx, DISTANCE_WINDOW)?;
                let increment_km = match recent.as_slice() {
                    [newest, previous, ..] => distance_km(previous.position, newest.position),
                    _ => 0.0,
                };

                let day_total_km =
                    daily_distance::get_total(tx, date)?.unwrap_or(0.0) + increment_km;
                daily_distance::upsert_total(tx, date, day_total_km)?;

                Ok(SampleRollup {
                    increment_km,
                    day_total_km,
                })
            })
        })
    }

    fn append_alert(
        &self,
        latitude: f64,
        longitude: f64,
        reason: AlertReason,
        timestamp: i64,
    ) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            alerts::insert_alert(conn, latitude, longitude, reason, timestamp).map(|_| ())
        })
    }

    fn recent_alerts(&self, limit: usize) -> Result<Vec<AlertEvent>, StorageError> {
        self.db.with_reader(|conn| alerts::query_recent(conn, limit))
    }
}
