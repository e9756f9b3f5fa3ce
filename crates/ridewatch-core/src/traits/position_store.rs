use chrono::NaiveDate;

use crate::errors::StorageError;
use crate::models::{AlertEvent, AlertReason, DailyDistanceTotal, PositionSample, SampleRollup};

/// Append/query access to the three persisted record streams:
/// position samples, per-day distance totals, and alert events.
///
/// "Recent" queries return rows newest first, ties broken by insertion order.
pub trait PositionStore: Send + Sync {
    // --- Position samples ---
    fn append_sample(&self, sample: &PositionSample) -> Result<(), StorageError>;
    fn recent_samples(&self, limit: usize) -> Result<Vec<PositionSample>, StorageError>;
    fn latest_sample(&self) -> Result<Option<PositionSample>, StorageError>;

    // --- Daily distance totals ---
    fn daily_total(&self, date: NaiveDate) -> Result<Option<f64>, StorageError>;
    fn upsert_daily_total(&self, date: NaiveDate, total_km: f64) -> Result<(), StorageError>;
    fn recent_daily_totals(&self, limit: usize) -> Result<Vec<DailyDistanceTotal>, StorageError>;

    /// Append `sample` and credit the distance from the sample persisted
    /// before it to `date`'s total, as one atomic write. On error neither
    /// the sample nor the total is changed.
    fn record_sample(
        &self,
        sample: &PositionSample,
        date: NaiveDate,
    ) -> Result<SampleRollup, StorageError>;

    // --- Alert log ---
    fn append_alert(
        &self,
        latitude: f64,
        longitude: f64,
        reason: AlertReason,
        timestamp: i64,
    ) -> Result<(), StorageError>;
    fn recent_alerts(&self, limit: usize) -> Result<Vec<AlertEvent>, StorageError>;
}
