//! Read-projection configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALERT_LOG_LIMIT, DEFAULT_WEEKLY_DAYS};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QueryConfig {
    /// Days in the weekly summary. Default: 7.
    pub weekly_days: Option<usize>,
    /// Entries in the alert log. Default: 25.
    pub alert_log_limit: Option<usize>,
}

impl QueryConfig {
    pub fn effective_weekly_days(&self) -> usize {
        self.weekly_days.unwrap_or(DEFAULT_WEEKLY_DAYS)
    }

    pub fn effective_alert_log_limit(&self) -> usize {
        self.alert_log_limit.unwrap_or(DEFAULT_ALERT_LOG_LIMIT)
    }
}
