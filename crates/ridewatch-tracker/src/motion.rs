//! Motion-alert state machine.
//!
//! [`TrackedObjectState`] is plain data; every transition is a method on it so
//! the caller can run a transition on a copy and commit the copy only once the
//! side effects it implies have been persisted.

use chrono::{DateTime, Duration, Utc};
use ridewatch_core::config::{DeadlineArming, TrackerConfig};
use ridewatch_core::geo::distance_m;
use ridewatch_core::{AlertReason, Coordinates};

/// Where the state machine is within a secured episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Unsecured,
    SecuredNoAlert,
    SecuredAlerted,
}

/// Thresholds the state machine evaluates samples against.
#[derive(Debug, Clone, Copy)]
pub struct MotionPolicy {
    pub threshold_m: f64,
    pub deadline: Duration,
    pub arming: DeadlineArming,
}

impl MotionPolicy {
    pub fn from_config(config: &TrackerConfig) -> Self {
        let secs = i64::try_from(config.effective_alert_deadline_secs()).unwrap_or(i64::MAX);
        Self {
            threshold_m: config.effective_motion_threshold_m(),
            deadline: Duration::try_seconds(secs).unwrap_or(Duration::MAX),
            arming: config.effective_deadline_arming(),
        }
    }
}

impl Default for MotionPolicy {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}

/// What the state machine decided about one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Movement from the previous baseline, in meters. Zero without a baseline.
    pub moved_m: f64,
    /// `Some` when this sample raised a threshold alert.
    pub alert: Option<AlertReason>,
}

/// The tracked object's in-memory state, owned by the tracker for the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackedObjectState {
    pub secured: bool,
    pub last_position: Option<Coordinates>,
    pub last_motion_at: Option<DateTime<Utc>>,
    pub alert_raised: bool,
}

impl TrackedObjectState {
    pub fn phase(&self) -> MotionPhase {
        match (self.secured, self.alert_raised) {
            (false, _) => MotionPhase::Unsecured,
            (true, false) => MotionPhase::SecuredNoAlert,
            (true, true) => MotionPhase::SecuredAlerted,
        }
    }

    /// Start a new secured episode.
    pub fn lock(&mut self) {
        self.secured = true;
        self.alert_raised = false;
        self.last_motion_at = None;
    }

    /// End any secured episode.
    pub fn unlock(&mut self) {
        self.secured = false;
        self.alert_raised = false;
        self.last_motion_at = None;
    }

    /// Feed one sample through the eager threshold check.
    ///
    /// The baseline always moves to `position`, alert or not. Only
    /// `SecuredNoAlert` evaluates motion.
    pub fn observe(
        &mut self,
        position: Coordinates,
        now: DateTime<Utc>,
        policy: &MotionPolicy,
    ) -> Observation {
        let moved_m = self
            .last_position
            .map(|previous| distance_m(previous, position))
            .unwrap_or(0.0);
        self.last_position = Some(position);

        if self.phase() != MotionPhase::SecuredNoAlert {
            return Observation {
                moved_m,
                alert: None,
            };
        }

        if moved_m > policy.threshold_m {
            self.last_motion_at = Some(now);
            self.alert_raised = true;
            return Observation {
                moved_m,
                alert: Some(AlertReason::ThresholdExceeded),
            };
        }

        if policy.arming == DeadlineArming::AnyMotion
            && moved_m > 0.0
            && self.last_motion_at.is_none()
        {
            self.last_motion_at = Some(now);
        }

        Observation {
            moved_m,
            alert: None,
        }
    }

    /// The end-of-request safety net: alert once the deadline has elapsed
    /// since motion was first observed in this episode.
    pub fn check_deadline(
        &mut self,
        now: DateTime<Utc>,
        policy: &MotionPolicy,
    ) -> Option<AlertReason> {
        if self.phase() != MotionPhase::SecuredNoAlert {
            return None;
        }
        let armed_at = self.last_motion_at?;
        if now.signed_duration_since(armed_at) >= policy.deadline {
            self.alert_raised = true;
            return Some(AlertReason::DeadlineElapsed);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn any_motion() -> MotionPolicy {
        MotionPolicy {
            arming: DeadlineArming::AnyMotion,
            ..MotionPolicy::default()
        }
    }

    const ORIGIN: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    #[test]
    fn starts_unsecured() {
        let state = TrackedObjectState::default();
        assert_eq!(state.phase(), MotionPhase::Unsecured);
        assert!(state.last_position.is_none());
    }

    #[test]
    fn first_sample_is_zero_motion() {
        let mut state = TrackedObjectState::default();
        state.lock();
        let obs = state.observe(Coordinates::new(45.0, 7.0), t(0), &MotionPolicy::default());
        assert_eq!(obs.moved_m, 0.0);
        assert_eq!(obs.alert, None);
        assert_eq!(state.last_position, Some(Coordinates::new(45.0, 7.0)));
    }

    #[test]
    fn large_jump_while_secured_alerts_once() {
        let policy = MotionPolicy::default();
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);

        let obs = state.observe(Coordinates::new(0.0, 0.001), t(1), &policy);
        assert_eq!(obs.alert, Some(AlertReason::ThresholdExceeded));
        assert_eq!(state.phase(), MotionPhase::SecuredAlerted);
        assert_eq!(state.last_motion_at, Some(t(1)));

        let again = state.observe(Coordinates::new(0.0, 0.01), t(2), &policy);
        assert_eq!(again.alert, None);
        assert_eq!(state.last_position, Some(Coordinates::new(0.0, 0.01)));
        assert_eq!(state.last_motion_at, Some(t(1)));
    }

    #[test]
    fn movement_exactly_at_threshold_does_not_alert() {
        let policy = MotionPolicy {
            threshold_m: distance_m(ORIGIN, Coordinates::new(0.0, 0.0001)),
            ..MotionPolicy::default()
        };
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);
        let obs = state.observe(Coordinates::new(0.0, 0.0001), t(1), &policy);
        assert_eq!(obs.alert, None);
    }

    #[test]
    fn unsecured_never_alerts() {
        let policy = MotionPolicy::default();
        let mut state = TrackedObjectState::default();
        state.observe(ORIGIN, t(0), &policy);
        let obs = state.observe(Coordinates::new(1.0, 1.0), t(1), &policy);
        assert!(obs.moved_m > 100_000.0);
        assert_eq!(obs.alert, None);
        assert_eq!(state.check_deadline(t(100), &policy), None);
        assert!(!state.alert_raised);
    }

    #[test]
    fn baseline_survives_lock_transitions() {
        let policy = MotionPolicy::default();
        let mut state = TrackedObjectState::default();
        state.observe(ORIGIN, t(0), &policy);
        state.lock();
        let obs = state.observe(Coordinates::new(0.0, 0.001), t(1), &policy);
        assert_eq!(obs.alert, Some(AlertReason::ThresholdExceeded));
    }

    #[test]
    fn unlock_resets_episode_from_any_phase() {
        let policy = MotionPolicy::default();
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);
        state.observe(Coordinates::new(0.0, 0.001), t(1), &policy);
        assert_eq!(state.phase(), MotionPhase::SecuredAlerted);

        state.unlock();
        assert_eq!(state.phase(), MotionPhase::Unsecured);
        assert!(!state.alert_raised);
        assert!(state.last_motion_at.is_none());
        assert!(state.last_position.is_some());
    }

    #[test]
    fn relock_starts_a_fresh_episode() {
        let policy = MotionPolicy::default();
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);
        state.observe(Coordinates::new(0.0, 0.001), t(1), &policy);

        state.lock();
        assert_eq!(state.phase(), MotionPhase::SecuredNoAlert);
        let obs = state.observe(Coordinates::new(0.0, 0.002), t(2), &policy);
        assert_eq!(obs.alert, Some(AlertReason::ThresholdExceeded));
    }

    #[test]
    fn threshold_only_arming_ignores_sub_threshold_drift() {
        let policy = MotionPolicy::default();
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);
        state.observe(Coordinates::new(0.0, 0.000005), t(1), &policy);
        assert!(state.last_motion_at.is_none());
        assert_eq!(state.check_deadline(t(60), &policy), None);
    }

    #[test]
    fn any_motion_arming_fires_deadline_alert() {
        let policy = any_motion();
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);
        state.observe(Coordinates::new(0.0, 0.000005), t(1), &policy);
        assert_eq!(state.last_motion_at, Some(t(1)));

        assert_eq!(state.check_deadline(t(10), &policy), None);
        // Later drift does not re-arm the clock.
        state.observe(Coordinates::new(0.0, 0.00001), t(5), &policy);
        assert_eq!(state.last_motion_at, Some(t(1)));

        assert_eq!(state.check_deadline(t(11), &policy), Some(AlertReason::DeadlineElapsed));
        assert_eq!(state.phase(), MotionPhase::SecuredAlerted);
        assert_eq!(state.check_deadline(t(12), &policy), None);
    }

    #[test]
    fn any_motion_does_not_arm_on_stationary_samples() {
        let policy = any_motion();
        let mut state = TrackedObjectState::default();
        state.lock();
        state.observe(ORIGIN, t(0), &policy);
        state.observe(ORIGIN, t(1), &policy);
        assert!(state.last_motion_at.is_none());
    }

    #[test]
    fn policy_reads_config() {
        let config = TrackerConfig {
            motion_threshold_m: Some(5.0),
            alert_deadline_secs: Some(30),
            deadline_arming: Some(DeadlineArming::AnyMotion),
            utc_offset_minutes: None,
        };
        let policy = MotionPolicy::from_config(&config);
        assert_eq!(policy.threshold_m, 5.0);
        assert_eq!(policy.deadline, Duration::seconds(30));
        assert_eq!(policy.arming, DeadlineArming::AnyMotion);
    }
}
