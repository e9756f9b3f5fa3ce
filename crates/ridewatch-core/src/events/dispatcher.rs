//! EventDispatcher: synchronous event dispatch, free when no handlers are registered.

use std::sync::Arc;

use super::handler::TrackerEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn TrackerEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn TrackerEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn TrackerEventHandler)>(&self, event_name: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::error!(event = event_name, "event handler panicked");
            }
        }
    }

    pub fn emit_alert_raised(&self, event: &AlertRaisedEvent) {
        self.emit("alert_raised", |h| h.on_alert_raised(event));
    }

    pub fn emit_secured_changed(&self, event: &SecuredChangedEvent) {
        self.emit("secured_changed", |h| h.on_secured_changed(event));
    }

    pub fn emit_sample_recorded(&self, event: &SampleRecordedEvent) {
        self.emit("sample_recorded", |h| h.on_sample_recorded(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
