//! Tracker errors. Aggregates subsystem errors via `From` conversions.

use super::error_code::{self, RidewatchErrorCode};
use super::{ConfigError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid sample: {reason}")]
    InvalidSample { reason: String },

    #[error("tracker state lock poisoned")]
    StatePoisoned,
}

impl RidewatchErrorCode for TrackerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::InvalidSample { .. } => error_code::INVALID_SAMPLE,
            Self::StatePoisoned => error_code::STATE_POISONED,
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
