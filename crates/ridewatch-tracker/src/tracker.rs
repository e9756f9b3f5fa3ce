//! Tracker: sequences the state machine, the distance accumulator and the
//! store for each request.
//!
//! All state mutations happen under one `Mutex`, held across the persistence
//! calls for a sample, so two concurrent samples can never both observe
//! `alert_raised == false` and both alert. Transitions run on a copy of the
//! state, committed only after the writes they imply succeed.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use ridewatch_core::config::{QueryConfig, RidewatchConfig};
use ridewatch_core::constants::VERSION;
use ridewatch_core::events::{
    AlertRaisedEvent, EventDispatcher, SampleRecordedEvent, SecuredChangedEvent,
};
use ridewatch_core::models::round_to;
use ridewatch_core::{
    AlertEvent, AlertReason, Clock, Coordinates, DailyDistanceTotal, PositionSample,
    PositionStore, SystemClock, TrackerError, TrackerResult,
};
use ridewatch_storage::RidewatchStorageEngine;
use serde::{Deserialize, Serialize};

use crate::accumulator::DistanceAccumulator;
use crate::motion::{MotionPolicy, TrackedObjectState};
use crate::queries::{self, TrackerStatus};

/// Response to a position report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The sample raised the episode's alert.
    Alert { alert: AlertEvent, message: String },
    /// The sample was persisted and rolled into the daily total.
    #[serde(rename = "ok")]
    Recorded { moved_m: f64, captured_at: i64 },
}

impl ReportOutcome {
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }

    pub fn alert(&self) -> Option<&AlertEvent> {
        match self {
            Self::Alert { alert, .. } => Some(alert),
            Self::Recorded { .. } => None,
        }
    }
}

fn alert_message(reason: AlertReason) -> &'static str {
    match reason {
        AlertReason::ThresholdExceeded => "Motion detected while locked!",
        AlertReason::DeadlineElapsed => "Motion alert auto-triggered (10s rule)",
    }
}

pub struct Tracker {
    state: Mutex<TrackedObjectState>,
    store: Arc<dyn PositionStore>,
    clock: Arc<dyn Clock>,
    policy: MotionPolicy,
    accumulator: DistanceAccumulator,
    query: QueryConfig,
    dispatcher: EventDispatcher,
}

impl Tracker {
    /// Create a tracker in the unsecured state.
    pub fn new(
        store: Arc<dyn PositionStore>,
        clock: Arc<dyn Clock>,
        config: &RidewatchConfig,
    ) -> Self {
        let policy = MotionPolicy::from_config(&config.tracker);
        tracing::info!(
            version = VERSION,
            threshold_m = policy.threshold_m,
            deadline_secs = policy.deadline.num_seconds(),
            arming = ?policy.arming,
            "tracker ready"
        );
        Self {
            state: Mutex::new(TrackedObjectState::default()),
            store,
            clock,
            policy,
            accumulator: DistanceAccumulator::new(config.tracker.day_bucketer()),
            query: config.query.clone(),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Open the configured database and run against the system clock.
    pub fn from_config(config: &RidewatchConfig) -> TrackerResult<Self> {
        let store = RidewatchStorageEngine::from_config(&config.storage)?;
        Ok(Self::new(Arc::new(store), Arc::new(SystemClock), config))
    }

    /// Resolve layered configuration for `root`, then open as [`Tracker::from_config`].
    pub fn open(root: &Path) -> TrackerResult<Self> {
        let config = RidewatchConfig::load(root)?;
        Self::from_config(&config)
    }

    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    fn lock_state(&self) -> TrackerResult<MutexGuard<'_, TrackedObjectState>> {
        self.state.lock().map_err(|_| TrackerError::StatePoisoned)
    }

    /// Process one position report.
    pub fn report_position(&self, latitude: f64, longitude: f64) -> TrackerResult<ReportOutcome> {
        let position = Coordinates::new(latitude, longitude);
        if !position.is_finite() {
            return Err(TrackerError::InvalidSample {
                reason: format!("non-finite coordinates ({latitude}, {longitude})"),
            });
        }

        let mut guard = self.lock_state()?;
        let now = self.clock.now();
        let mut next = *guard;
        let observation = next.observe(position, now, &self.policy);

        if let Some(reason) = observation.alert {
            let alert = self.persist_alert(position, reason, now)?;
            *guard = next;
            drop(guard);
            return Ok(self.announce_alert(alert));
        }

        let sample = PositionSample {
            position,
            captured_at: now.timestamp(),
        };
        let accumulation = self.accumulator.record(self.store.as_ref(), &sample, now)?;
        *guard = next;

        let moved_m = round_to(observation.moved_m, 2);
        tracing::debug!(
            lat = latitude,
            lng = longitude,
            moved_m,
            day_total_km = accumulation.day_total_km,
            timestamp = sample.captured_at,
            "position update"
        );

        // Safety net, measured against the clock after persistence.
        let checked_at = self.clock.now();
        let mut after = next;
        let deadline_alert = match after.check_deadline(checked_at, &self.policy) {
            Some(reason) => self.persist_alert(position, reason, checked_at).map(|alert| {
                *guard = after;
                Some(alert)
            }),
            None => Ok(None),
        };
        drop(guard);

        // The sample is in the store whether or not the deadline alert was.
        self.dispatcher.emit_sample_recorded(&SampleRecordedEvent {
            sample,
            moved_m: observation.moved_m,
            increment_km: accumulation.increment_km,
        });

        Ok(match deadline_alert? {
            Some(alert) => self.announce_alert(alert),
            None => ReportOutcome::Recorded {
                moved_m,
                captured_at: sample.captured_at,
            },
        })
    }

    fn persist_alert(
        &self,
        position: Coordinates,
        reason: AlertReason,
        at: DateTime<Utc>,
    ) -> TrackerResult<AlertEvent> {
        let alert = AlertEvent {
            position,
            reason,
            timestamp: at.timestamp(),
        };
        self.store
            .append_alert(position.latitude, position.longitude, reason, alert.timestamp)?;
        Ok(alert)
    }

    /// Log and dispatch an alert that has been persisted and latched.
    fn announce_alert(&self, alert: AlertEvent) -> ReportOutcome {
        tracing::warn!(
            reason = %alert.reason,
            lat = alert.position.latitude,
            lng = alert.position.longitude,
            timestamp = alert.timestamp,
            "{}",
            alert.reason.description()
        );
        self.dispatcher
            .emit_alert_raised(&AlertRaisedEvent { alert });
        ReportOutcome::Alert {
            alert,
            message: alert_message(alert.reason).to_string(),
        }
    }

    /// Enter the secured state, starting a new episode. Returns `secured`.
    pub fn lock(&self) -> TrackerResult<bool> {
        self.transition(TrackedObjectState::lock)
    }

    /// Leave the secured state. Returns `secured`.
    pub fn unlock(&self) -> TrackerResult<bool> {
        self.transition(TrackedObjectState::unlock)
    }

    /// Apply a lock/unlock transition and announce it.
    ///
    /// The event is emitted before the state lock is released, so handlers
    /// see transitions in the order they were applied. Handlers must not
    /// call back into the tracker from `on_secured_changed`.
    fn transition(&self, apply: fn(&mut TrackedObjectState)) -> TrackerResult<bool> {
        let mut guard = self.lock_state()?;
        apply(&mut *guard);
        let secured = guard.secured;
        tracing::info!(secured, "secured state changed");
        self.dispatcher
            .emit_secured_changed(&SecuredChangedEvent { secured });
        drop(guard);
        Ok(secured)
    }

    /// Snapshot of the in-memory alerting state.
    pub fn status(&self) -> TrackerResult<TrackerStatus> {
        let guard = self.lock_state()?;
        Ok(TrackerStatus::from(&*guard))
    }

    pub fn latest(&self) -> TrackerResult<Option<PositionSample>> {
        Ok(queries::latest_position(self.store.as_ref())?)
    }

    pub fn weekly_summary(&self) -> TrackerResult<Vec<DailyDistanceTotal>> {
        Ok(queries::weekly_summary(
            self.store.as_ref(),
            self.query.effective_weekly_days(),
        )?)
    }

    pub fn alerts(&self) -> TrackerResult<Vec<AlertEvent>> {
        Ok(queries::alert_log(
            self.store.as_ref(),
            self.query.effective_alert_log_limit(),
        )?)
    }
}
