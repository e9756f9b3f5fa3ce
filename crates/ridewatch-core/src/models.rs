//! Data model: position samples, alert events, daily distance totals.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// One inbound position report, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    #[serde(flatten)]
    pub position: Coordinates,
    /// Unix seconds.
    #[serde(rename = "timestamp")]
    pub captured_at: i64,
}

impl PositionSample {
    pub fn new(latitude: f64, longitude: f64, captured_at: i64) -> Self {
        Self {
            position: Coordinates::new(latitude, longitude),
            captured_at,
        }
    }
}

/// Why an alert fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    /// A single sample moved the baseline past the motion threshold.
    ThresholdExceeded,
    /// Motion was observed and the alert deadline elapsed without an alert.
    DeadlineElapsed,
}

impl AlertReason {
    /// Stable code used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThresholdExceeded => "threshold_exceeded",
            Self::DeadlineElapsed => "deadline_elapsed",
        }
    }

    /// Human-readable description for logs and clients.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ThresholdExceeded => "Motion detected while locked",
            Self::DeadlineElapsed => "Auto-triggered (10s rule)",
        }
    }
}

impl fmt::Display for AlertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threshold_exceeded" => Ok(Self::ThresholdExceeded),
            "deadline_elapsed" => Ok(Self::DeadlineElapsed),
            other => Err(format!("unknown alert reason: {other}")),
        }
    }
}

/// An entry in the append-only alert log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(flatten)]
    pub position: Coordinates,
    pub reason: AlertReason,
    /// Unix seconds.
    pub timestamp: i64,
}

/// Cumulative distance traveled on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyDistanceTotal {
    pub date: NaiveDate,
    pub distance_km: f64,
}

impl DailyDistanceTotal {
    /// Copy with the distance rounded to 2 decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            date: self.date,
            distance_km: round_to(self.distance_km, 2),
        }
    }
}

/// Effect of recording one sample on the distance rollup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRollup {
    /// Distance from the previously persisted sample, 0 for the first one.
    pub increment_km: f64,
    /// The day's total after crediting `increment_km`.
    pub day_total_km: f64,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
