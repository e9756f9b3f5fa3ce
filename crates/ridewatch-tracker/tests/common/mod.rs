//! Shared fixtures for tracker integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use ridewatch_core::config::{DeadlineArming, RidewatchConfig};
use ridewatch_core::errors::StorageError;
use ridewatch_core::{
    AlertEvent, AlertReason, DailyDistanceTotal, ManualClock, PositionSample, PositionStore,
    SampleRollup,
};
use ridewatch_storage::RidewatchStorageEngine;
use ridewatch_tracker::Tracker;

/// 2023-11-14T22:13:20Z
pub const START: i64 = 1_700_000_000;

pub fn config(arming: DeadlineArming) -> RidewatchConfig {
    let mut config = RidewatchConfig::default();
    config.tracker.deadline_arming = Some(arming);
    config.tracker.utc_offset_minutes = Some(0);
    config
}

pub struct Harness {
    pub tracker: Tracker,
    pub store: Arc<FlakyStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(arming: DeadlineArming) -> Harness {
    harness_at(arming, START)
}

pub fn harness_at(arming: DeadlineArming, start: i64) -> Harness {
    let store = Arc::new(FlakyStore::new());
    let clock = Arc::new(ManualClock::at_unix(start));
    let tracker = Tracker::new(store.clone(), clock.clone(), &config(arming));
    Harness {
        tracker,
        store,
        clock,
    }
}

/// In-memory engine whose individual operations can be made to fail.
pub struct FlakyStore {
    inner: RidewatchStorageEngine,
    pub fail_append_sample: AtomicBool,
    pub fail_append_alert: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: RidewatchStorageEngine::open_in_memory().unwrap(),
            fail_append_sample: AtomicBool::new(false),
            fail_append_alert: AtomicBool::new(false),
        }
    }

    /// Make every write to `daily_distance` abort inside SQLite, so the
    /// failure lands after the sample insert of the same transaction.
    pub fn block_rollup(&self, blocked: bool) {
        let sql = if blocked {
            "CREATE TRIGGER block_rollup_insert BEFORE INSERT ON daily_distance
             BEGIN SELECT RAISE(ABORT, 'rollup blocked'); END;
             CREATE TRIGGER block_rollup_update BEFORE UPDATE ON daily_distance
             BEGIN SELECT RAISE(ABORT, 'rollup blocked'); END;"
        } else {
            "DROP TRIGGER block_rollup_insert; DROP TRIGGER block_rollup_update;"
        };
        self.inner
            .db()
            .with_writer(|conn| {
                conn.execute_batch(sql).map_err(|e| StorageError::SqliteError {
                    message: e.to_string(),
                })
            })
            .unwrap();
    }

    pub fn sample_count(&self) -> usize {
        self.inner.recent_samples(usize::MAX >> 1).unwrap().len()
    }

    pub fn total_on(&self, date: NaiveDate) -> Option<f64> {
        self.inner.daily_total(date).unwrap()
    }

    pub fn alert_count(&self) -> usize {
        self.inner.recent_alerts(usize::MAX >> 1).unwrap().len()
    }
}

fn injected(op: &str) -> StorageError {
    StorageError::SqliteError {
        message: format!("injected failure in {op}"),
    }
}

impl PositionStore for FlakyStore {
    fn append_sample(&self, sample: &PositionSample) -> Result<(), StorageError> {
        if self.fail_append_sample.load(Ordering::SeqCst) {
            return Err(injected("append_sample"));
        }
        self.inner.append_sample(sample)
    }

    fn recent_samples(&self, limit: usize) -> Result<Vec<PositionSample>, StorageError> {
        self.inner.recent_samples(limit)
    }

    fn latest_sample(&self) -> Result<Option<PositionSample>, StorageError> {
        self.inner.latest_sample()
    }

    fn daily_total(&self, date: NaiveDate) -> Result<Option<f64>, StorageError> {
        self.inner.daily_total(date)
    }

    fn upsert_daily_total(&self, date: NaiveDate, total_km: f64) -> Result<(), StorageError> {
        self.inner.upsert_daily_total(date, total_km)
    }

    fn recent_daily_totals(&self, limit: usize) -> Result<Vec<DailyDistanceTotal>, StorageError> {
        self.inner.recent_daily_totals(limit)
    }

    fn record_sample(
        &self,
        sample: &PositionSample,
        date: NaiveDate,
    ) -> Result<SampleRollup, StorageError> {
        if self.fail_append_sample.load(Ordering::SeqCst) {
            return Err(injected("record_sample"));
        }
        self.inner.record_sample(sample, date)
    }

    fn append_alert(
        &self,
        latitude: f64,
        longitude: f64,
        reason: AlertReason,
        timestamp: i64,
    ) -> Result<(), StorageError> {
        if self.fail_append_alert.load(Ordering::SeqCst) {
            return Err(injected("append_alert"));
        }
        self.inner.append_alert(latitude, longitude, reason, timestamp)
    }

    fn recent_alerts(&self, limit: usize) -> Result<Vec<AlertEvent>, StorageError> {
        self.inner.recent_alerts(limit)
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
