use super::types::*;

/// Receives tracker events. Every method defaults to a no-op, so handlers
/// only implement what they care about.
pub trait TrackerEventHandler: Send + Sync {
    fn on_alert_raised(&self, _event: &AlertRaisedEvent) {}
    fn on_secured_changed(&self, _event: &SecuredChangedEvent) {}
    fn on_sample_recorded(&self, _event: &SampleRecordedEvent) {}
}
