//! Tests for the ridewatch configuration system.

use std::sync::Mutex;

use ridewatch_core::config::{DeadlineArming, RidewatchConfig};
use ridewatch_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_KEYS: [&str; 8] = [
    "RIDEWATCH_MOTION_THRESHOLD_M",
    "RIDEWATCH_ALERT_DEADLINE_SECS",
    "RIDEWATCH_DEADLINE_ARMING",
    "RIDEWATCH_UTC_OFFSET_MINUTES",
    "RIDEWATCH_DB_PATH",
    "RIDEWATCH_READ_POOL_SIZE",
    "RIDEWATCH_WEEKLY_DAYS",
    "RIDEWATCH_ALERT_LOG_LIMIT",
];

fn clear_env_vars() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_when_nothing_configured() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let config = RidewatchConfig::load(dir.path()).unwrap();

    assert_eq!(config.tracker.effective_motion_threshold_m(), 2.0);
    assert_eq!(config.tracker.effective_alert_deadline_secs(), 10);
    assert_eq!(
        config.tracker.effective_deadline_arming(),
        DeadlineArming::ThresholdOnly
    );
    assert_eq!(config.query.effective_weekly_days(), 7);
    assert_eq!(config.query.effective_alert_log_limit(), 25);
    assert_eq!(config.storage.effective_read_pool_size(), 4);
}

#[test]
fn env_overrides_project_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("ridewatch.toml"),
        r#"
[tracker]
motion_threshold_m = 3.5
alert_deadline_secs = 20

[query]
weekly_days = 14
"#,
    )
    .unwrap();
    std::env::set_var("RIDEWATCH_ALERT_DEADLINE_SECS", "5");
    std::env::set_var("RIDEWATCH_DEADLINE_ARMING", "any_motion");

    let config = RidewatchConfig::load(dir.path()).unwrap();

    assert_eq!(config.tracker.motion_threshold_m, Some(3.5));
    assert_eq!(config.tracker.alert_deadline_secs, Some(5));
    assert_eq!(config.tracker.deadline_arming, Some(DeadlineArming::AnyMotion));
    assert_eq!(config.query.weekly_days, Some(14));

    clear_env_vars();
}

#[test]
fn unparseable_env_value_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("RIDEWATCH_MOTION_THRESHOLD_M", "two meters");
    let result = RidewatchConfig::load(dir.path());
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));

    clear_env_vars();
}

#[test]
fn invalid_project_toml_is_a_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ridewatch.toml"), "[tracker\nbroken").unwrap();
    let result = RidewatchConfig::load(dir.path());
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn validation_rejects_out_of_range_values() {
    let cases = [
        "[tracker]\nmotion_threshold_m = 0.0",
        "[tracker]\nmotion_threshold_m = -1.0",
        "[tracker]\nalert_deadline_secs = 0",
        "[tracker]\nutc_offset_minutes = 900",
        "[storage]\nread_pool_size = 0",
        "[storage]\nread_pool_size = 9",
        "[query]\nweekly_days = 0",
        "[query]\nalert_log_limit = 0",
    ];
    for case in cases {
        let result = RidewatchConfig::from_toml(case);
        assert!(
            matches!(result, Err(ConfigError::ValidationFailed { .. })),
            "expected validation failure for {case:?}"
        );
    }
}

#[test]
fn unknown_keys_are_ignored() {
    let config = RidewatchConfig::from_toml("[tracker]\nfuture_knob = true\n").unwrap();
    assert!(config.tracker.motion_threshold_m.is_none());
}

#[test]
fn toml_roundtrip_preserves_values() {
    let config = RidewatchConfig::from_toml(
        "[tracker]\ndeadline_arming = \"any_motion\"\nutc_offset_minutes = -300\n\n[storage]\ndb_path = \"/var/lib/ridewatch/gps.db\"\n",
    )
    .unwrap();
    let reparsed = RidewatchConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(reparsed.tracker.deadline_arming, Some(DeadlineArming::AnyMotion));
    assert_eq!(reparsed.tracker.utc_offset_minutes, Some(-300));
    assert_eq!(
        reparsed.storage.effective_db_path(),
        std::path::PathBuf::from("/var/lib/ridewatch/gps.db")
    );
}
