//! Error handling for ridewatch.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod storage_error;
pub mod tracker_error;

pub use config_error::ConfigError;
pub use error_code::RidewatchErrorCode;
pub use storage_error::StorageError;
pub use tracker_error::{TrackerError, TrackerResult};
