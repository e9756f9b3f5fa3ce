//! # ridewatch-storage
//!
//! SQLite persistence gateway for ridewatch: a serialized writer plus read pool,
//! versioned migrations, and one query module per record stream.

pub mod connection;
pub mod engine;
pub mod migrations;
pub mod queries;

pub use connection::DatabaseManager;
pub use engine::RidewatchStorageEngine;

use ridewatch_core::errors::StorageError;

/// Wrap any displayable failure as a [`StorageError::SqliteError`].
pub(crate) fn to_storage_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}
