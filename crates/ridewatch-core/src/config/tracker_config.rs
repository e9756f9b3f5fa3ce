//! Motion-alert configuration.

use serde::{Deserialize, Serialize};

use crate::clock::DayBucketer;
use crate::constants::{DEFAULT_ALERT_DEADLINE_SECS, DEFAULT_MOTION_THRESHOLD_M};

/// Which movements start the alert-deadline clock while secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineArming {
    /// Only a movement past the threshold arms the clock. Such a movement
    /// also raises an immediate alert, so the deadline alert cannot fire.
    #[default]
    ThresholdOnly,
    /// Any nonzero movement arms the clock, so slow sub-threshold drift
    /// raises a deadline alert once the deadline elapses.
    AnyMotion,
}

impl std::str::FromStr for DeadlineArming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold_only" => Ok(Self::ThresholdOnly),
            "any_motion" => Ok(Self::AnyMotion),
            other => Err(format!("unknown deadline arming mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// Movement in meters that counts as motion. Default: 2.0.
    pub motion_threshold_m: Option<f64>,
    /// Seconds between first observed motion and a forced alert. Default: 10.
    pub alert_deadline_secs: Option<u64>,
    /// Default: `threshold_only`.
    pub deadline_arming: Option<DeadlineArming>,
    /// Offset used to bucket samples into calendar days. Default: process local offset.
    pub utc_offset_minutes: Option<i32>,
}

impl TrackerConfig {
    pub fn effective_motion_threshold_m(&self) -> f64 {
        self.motion_threshold_m.unwrap_or(DEFAULT_MOTION_THRESHOLD_M)
    }

    pub fn effective_alert_deadline_secs(&self) -> u64 {
        self.alert_deadline_secs.unwrap_or(DEFAULT_ALERT_DEADLINE_SECS)
    }

    pub fn effective_deadline_arming(&self) -> DeadlineArming {
        self.deadline_arming.unwrap_or_default()
    }

    pub fn day_bucketer(&self) -> DayBucketer {
        match self.utc_offset_minutes {
            Some(minutes) => DayBucketer::from_offset_minutes(minutes),
            None => DayBucketer::local(),
        }
    }
}
