//! Tracker lifecycle events and their synchronous dispatcher.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::TrackerEventHandler;
pub use types::{AlertRaisedEvent, SampleRecordedEvent, SecuredChangedEvent};
