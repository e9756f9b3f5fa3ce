//! Event payload types.

use crate::models::{AlertEvent, PositionSample};

/// Payload for `on_alert_raised`. Emitted after the alert has been persisted.
#[derive(Debug, Clone)]
pub struct AlertRaisedEvent {
    pub alert: AlertEvent,
}

/// Payload for `on_secured_changed`.
#[derive(Debug, Clone)]
pub struct SecuredChangedEvent {
    pub secured: bool,
}

/// Payload for `on_sample_recorded`.
#[derive(Debug, Clone)]
pub struct SampleRecordedEvent {
    pub sample: PositionSample,
    pub moved_m: f64,
    pub increment_km: f64,
}
