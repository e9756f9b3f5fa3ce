//! # ridewatch-core
//!
//! Foundation crate for ridewatch.
//! Defines the data model, geo-distance, clock, errors, config, events and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod geo;
pub mod models;
pub mod tracing_setup;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{Clock, DayBucketer, ManualClock, SystemClock};
pub use config::RidewatchConfig;
pub use errors::{ConfigError, RidewatchErrorCode, StorageError, TrackerError, TrackerResult};
pub use models::{
    AlertEvent, AlertReason, Coordinates, DailyDistanceTotal, PositionSample, SampleRollup,
};
pub use traits::PositionStore;
