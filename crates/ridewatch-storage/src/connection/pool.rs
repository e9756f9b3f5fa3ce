//! Read-only connections serving the query side (latest position, weekly
//! summary, alert log) of a file-backed database.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, TryLockError};

use ridewatch_core::constants::MAX_READ_POOL_SIZE;
use ridewatch_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers on `path`, clamped to `1..=MAX_READ_POOL_SIZE`.
    /// The database must already exist and be migrated.
    pub fn open(path: &Path, size: usize) -> Result<Self, StorageError> {
        let readers = (0..size.clamp(1, MAX_READ_POOL_SIZE))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the first idle reader after the cursor, or wait on the
    /// cursor's reader when all of them are busy.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let count = self.readers.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % count;

        for offset in 0..count {
            match self.readers[(start + offset) % count].try_lock() {
                Ok(guard) => return f(&guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
            }
        }

        let guard = self.readers[start].lock().map_err(|_| poisoned())?;
        f(&guard)
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }
}

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(to_storage_err)?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}

fn poisoned() -> StorageError {
    to_storage_err("read connection lock poisoned")
}
