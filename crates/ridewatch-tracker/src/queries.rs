//! Read-only projections over the store and the in-memory state.

use chrono::{DateTime, Utc};
use ridewatch_core::errors::StorageError;
use ridewatch_core::{AlertEvent, DailyDistanceTotal, PositionSample, PositionStore};
use serde::{Deserialize, Serialize};

use crate::motion::TrackedObjectState;

/// Alerting status as currently held in memory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerStatus {
    pub secured: bool,
    pub alert_raised: bool,
    pub last_motion_at: Option<DateTime<Utc>>,
}

impl From<&TrackedObjectState> for TrackerStatus {
    fn from(state: &TrackedObjectState) -> Self {
        Self {
            secured: state.secured,
            alert_raised: state.alert_raised,
            last_motion_at: state.last_motion_at,
        }
    }
}

/// Most recent persisted sample, if any.
pub fn latest_position(store: &dyn PositionStore) -> Result<Option<PositionSample>, StorageError> {
    store.latest_sample()
}

/// The last `days` daily totals, newest first, rounded to 2 decimals.
pub fn weekly_summary(
    store: &dyn PositionStore,
    days: usize,
) -> Result<Vec<DailyDistanceTotal>, StorageError> {
    Ok(store
        .recent_daily_totals(days)?
        .iter()
        .map(DailyDistanceTotal::rounded)
        .collect())
}

/// The last `limit` alerts, newest first.
pub fn alert_log(store: &dyn PositionStore, limit: usize) -> Result<Vec<AlertEvent>, StorageError> {
    store.recent_alerts(limit)
}
