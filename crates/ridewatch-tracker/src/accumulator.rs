//! Distance accumulator: persists a sample and rolls the distance it adds
//! into the current calendar day's total.

use chrono::{DateTime, NaiveDate, Utc};
use ridewatch_core::errors::StorageError;
use ridewatch_core::{DayBucketer, PositionSample, PositionStore};

/// Result of accumulating one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulation {
    pub date: NaiveDate,
    pub increment_km: f64,
    pub day_total_km: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceAccumulator {
    bucketer: DayBucketer,
}

impl DistanceAccumulator {
    pub fn new(bucketer: DayBucketer) -> Self {
        Self { bucketer }
    }

    /// Persist `sample` and credit the distance from the sample before it
    /// to the day `now` falls on.
    ///
    /// The store does both in one transaction, so a failure leaves neither the
    /// sample nor the total behind and the next sample is measured from the
    /// same predecessor.
    pub fn record(
        &self,
        store: &dyn PositionStore,
        sample: &PositionSample,
        now: DateTime<Utc>,
    ) -> Result<Accumulation, StorageError> {
        let date = self.bucketer.day_of(now);
        let rollup = store.record_sample(sample, date)?;
        Ok(Accumulation {
            date,
            increment_km: rollup.increment_km,
            day_total_km: rollup.day_total_km,
        })
    }
}
