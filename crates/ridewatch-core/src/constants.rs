/// ridewatch version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Mean Earth radius used by the haversine distance, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Movement between consecutive samples that counts as motion while secured.
pub const DEFAULT_MOTION_THRESHOLD_M: f64 = 2.0;

/// Upper bound on alert latency once motion has been observed.
pub const DEFAULT_ALERT_DEADLINE_SECS: u64 = 10;

/// Samples consulted when computing the incremental distance.
pub const DISTANCE_WINDOW: usize = 2;

/// Rows returned by the weekly summary.
pub const DEFAULT_WEEKLY_DAYS: usize = 7;

/// Rows returned by the alert log.
pub const DEFAULT_ALERT_LOG_LIMIT: usize = 25;

/// Default database file name.
pub const DEFAULT_DB_FILE: &str = "ridewatch.db";

/// Read connections opened for a file-backed database unless configured.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Largest accepted `storage.read_pool_size`.
pub const MAX_READ_POOL_SIZE: usize = 8;

/// Calendar-day key format for daily distance rows.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";
