//! V001: position samples, daily distance rollups, motion alerts.

pub const MIGRATION_SQL: &str = r#"
-- Every accepted position report, append-only.
CREATE TABLE IF NOT EXISTS position_samples (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    captured_at INTEGER NOT NULL
) STRICT;

-- One row per calendar day; updated additively as samples arrive.
CREATE TABLE IF NOT EXISTS daily_distance (
    date TEXT PRIMARY KEY,
    distance_km REAL NOT NULL DEFAULT 0
) STRICT;

-- Alert log, append-only.
CREATE TABLE IF NOT EXISTS motion_alerts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    reason TEXT NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_motion_alerts_created
    ON motion_alerts(created_at);
"#;
