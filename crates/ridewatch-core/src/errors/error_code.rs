//! Stable, machine-readable error codes.

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_SAMPLE: &str = "INVALID_SAMPLE";
pub const STATE_POISONED: &str = "STATE_POISONED";

/// Maps an error onto a code a transport layer can match on.
pub trait RidewatchErrorCode {
    fn error_code(&self) -> &'static str;
}
