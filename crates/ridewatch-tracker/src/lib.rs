//! # ridewatch-tracker
//!
//! Decides, from a stream of position samples, whether a secured object has
//! moved, raising at most one alert per secured episode, while rolling the same
//! samples into per-day distance totals.

pub mod accumulator;
pub mod motion;
pub mod queries;
pub mod tracker;

pub use accumulator::{Accumulation, DistanceAccumulator};
pub use motion::{MotionPhase, MotionPolicy, TrackedObjectState};
pub use queries::TrackerStatus;
pub use tracker::{ReportOutcome, Tracker};
