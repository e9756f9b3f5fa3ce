//! Top-level ridewatch configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DeadlineArming, QueryConfig, StorageConfig, TrackerConfig};
use crate::constants::MAX_READ_POOL_SIZE;
use crate::errors::ConfigError;

/// Project config file name, looked up in the root passed to [`RidewatchConfig::load`].
pub const PROJECT_CONFIG_FILE: &str = "ridewatch.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`RIDEWATCH_*`)
/// 2. Project config (`ridewatch.toml` in the given root)
/// 3. User config (`~/.ridewatch/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RidewatchConfig {
    pub tracker: TrackerConfig,
    pub storage: StorageConfig,
    pub query: QueryConfig,
}

impl RidewatchConfig {
    /// Load configuration with layered resolution, then validate it.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Unreadable files are skipped, bad TOML is not.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) | Err(ConfigError::FileNotFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config)?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(config: &RidewatchConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.tracker.motion_threshold_m {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(invalid("tracker.motion_threshold_m", "must be a positive number"));
            }
        }
        if config.tracker.alert_deadline_secs == Some(0) {
            return Err(invalid("tracker.alert_deadline_secs", "must be greater than 0"));
        }
        if let Some(minutes) = config.tracker.utc_offset_minutes {
            if !(-14 * 60..=14 * 60).contains(&minutes) {
                return Err(invalid(
                    "tracker.utc_offset_minutes",
                    "must be between -840 and 840",
                ));
            }
        }
        if let Some(size) = config.storage.read_pool_size {
            if !(1..=MAX_READ_POOL_SIZE).contains(&size) {
                return Err(invalid(
                    "storage.read_pool_size",
                    format!("must be between 1 and {MAX_READ_POOL_SIZE}"),
                ));
            }
        }
        if config.query.weekly_days == Some(0) {
            return Err(invalid("query.weekly_days", "must be greater than 0"));
        }
        if config.query.alert_log_limit == Some(0) {
            return Err(invalid("query.alert_log_limit", "must be greater than 0"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.ridewatch/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".ridewatch").join("config.toml"))
    }

    fn merge_toml_file(config: &mut RidewatchConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: RidewatchConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), "merged config file");
        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut RidewatchConfig, other: &RidewatchConfig) {
        // Tracker
        if other.tracker.motion_threshold_m.is_some() {
            base.tracker.motion_threshold_m = other.tracker.motion_threshold_m;
        }
        if other.tracker.alert_deadline_secs.is_some() {
            base.tracker.alert_deadline_secs = other.tracker.alert_deadline_secs;
        }
        if other.tracker.deadline_arming.is_some() {
            base.tracker.deadline_arming = other.tracker.deadline_arming;
        }
        if other.tracker.utc_offset_minutes.is_some() {
            base.tracker.utc_offset_minutes = other.tracker.utc_offset_minutes;
        }

        // Storage
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }

        // Query
        if other.query.weekly_days.is_some() {
            base.query.weekly_days = other.query.weekly_days;
        }
        if other.query.alert_log_limit.is_some() {
            base.query.alert_log_limit = other.query.alert_log_limit;
        }
    }

    /// Apply `RIDEWATCH_*` environment overrides. Unparseable values are errors.
    fn apply_env_overrides(config: &mut RidewatchConfig) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<f64>("RIDEWATCH_MOTION_THRESHOLD_M")? {
            config.tracker.motion_threshold_m = Some(v);
        }
        if let Some(v) = env_parse::<u64>("RIDEWATCH_ALERT_DEADLINE_SECS")? {
            config.tracker.alert_deadline_secs = Some(v);
        }
        if let Some(v) = env_parse::<DeadlineArming>("RIDEWATCH_DEADLINE_ARMING")? {
            config.tracker.deadline_arming = Some(v);
        }
        if let Some(v) = env_parse::<i32>("RIDEWATCH_UTC_OFFSET_MINUTES")? {
            config.tracker.utc_offset_minutes = Some(v);
        }
        if let Ok(v) = std::env::var("RIDEWATCH_DB_PATH") {
            config.storage.db_path = Some(v);
        }
        if let Some(v) = env_parse::<usize>("RIDEWATCH_READ_POOL_SIZE")? {
            config.storage.read_pool_size = Some(v);
        }
        if let Some(v) = env_parse::<usize>("RIDEWATCH_WEEKLY_DAYS")? {
            config.query.weekly_days = Some(v);
        }
        if let Some(v) = env_parse::<usize>("RIDEWATCH_ALERT_LOG_LIMIT")? {
            config.query.alert_log_limit = Some(v);
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::ParseError {
                path: format!("${key}"),
                message: format!("cannot parse {raw:?}"),
            }),
        Err(_) => Ok(None),
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
