//! Clock abstraction and calendar-day bucketing.
//!
//! Every time-dependent decision (the alert deadline, the day a distance
//! increment is credited to) reads time through [`Clock`], so tests can
//! drive it with a [`ManualClock`].

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, Offset, Utc};

use crate::constants::DAY_KEY_FORMAT;

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Start at the given unix second.
    pub fn at_unix(secs: i64) -> Self {
        Self::new(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Maps instants onto calendar days under a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct DayBucketer {
    offset: FixedOffset,
}

impl DayBucketer {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Offset from a minute count; out-of-range values fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .unwrap_or_else(Self::utc)
    }

    /// The process's local offset as of now.
    pub fn local() -> Self {
        Self::new(Local::now().offset().fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar day `instant` falls on.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Storage key (`YYYY-MM-DD`) for the day `instant` falls on.
    pub fn day_key(&self, instant: DateTime<Utc>) -> String {
        self.day_of(instant).format(DAY_KEY_FORMAT).to_string()
    }
}

impl Default for DayBucketer {
    fn default() -> Self {
        Self::local()
    }
}
