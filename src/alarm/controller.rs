//! Alarm Controller
//!
//! Owns the alarm state machine:
//!
//! ```text
//! Idle --trigger--> Ringing --take/snooze--> Acknowledging --> Idle
//! ```
//!
//! Triggering persists the alarm as the session's current alarm, shows the
//! alert view and starts the alerter. Acknowledging stops the sound first,
//! then reports the new status to the API. A failed status update is logged
//! and otherwise ignored.

use std::sync::{Arc, Mutex};

use super::audio::AudioAlerter;
use super::AlarmApi;
use crate::api::{Alarm, AlarmStatus};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Idle,
    Ringing,
    Acknowledging,
}

/// Screens the controller can send the user to
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Full-screen alert for a due dose
    Alert(Alarm),
    Dashboard,
}

/// Where navigation requests go (a page router, a terminal printer, ...)
pub trait Navigator: Send + Sync {
    fn navigate(&self, view: View);
}

/// How the user dismissed the alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Dose taken; leave the alert for the dashboard
    Take,
    /// Remind later; stay on the alert view
    Snooze,
}

impl Acknowledgement {
    pub fn status(&self) -> AlarmStatus {
        match self {
            Acknowledgement::Take => AlarmStatus::Taken,
            Acknowledgement::Snooze => AlarmStatus::Snoozed,
        }
    }
}

/// Why an acknowledgement sent nothing to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoCurrentAlarm,
    MissingAlarmId,
    MalformedAlarm,
    NotAuthenticated,
}

/// Result of an acknowledgement
#[derive(Debug, Clone, PartialEq)]
pub enum AckOutcome {
    Updated(AlarmStatus),
    /// The update request failed; the failure was logged and swallowed
    UpdateFailed(String),
    Skipped(SkipReason),
}

/// The alarm workflow, constructed once and shared by the poller and the UI
pub struct AlarmController {
    api: Arc<dyn AlarmApi>,
    session: Session,
    alerter: AudioAlerter,
    navigator: Arc<dyn Navigator>,
    state: Mutex<AlarmState>,
}

impl AlarmController {
    pub fn new(
        api: Arc<dyn AlarmApi>,
        session: Session,
        alerter: AudioAlerter,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            alerter,
            navigator,
            state: Mutex::new(AlarmState::Idle),
        }
    }

    pub fn state(&self) -> AlarmState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_state(&self, next: AlarmState) {
        if let Ok(mut state) = self.state.lock() {
            if *state != next {
                tracing::debug!(from = ?*state, to = ?next, "Alarm state change");
            }
            *state = next;
        }
    }

    pub fn alerter(&self) -> &AudioAlerter {
        &self.alerter
    }

    /// Move from idle to ringing for `alarm`.
    ///
    /// Returns `false` (and does nothing) unless the controller is idle.
    pub fn trigger(&self, alarm: Alarm) -> bool {
        {
            let Ok(mut state) = self.state.lock() else {
                return false;
            };
            if *state != AlarmState::Idle {
                return false;
            }
            *state = AlarmState::Ringing;
        }

        tracing::info!(
            medication = %alarm.medication_name,
            scheduled_time = %alarm.scheduled_time,
            "Alarm due"
        );

        if let Err(e) = self.session.set_current_alarm(&alarm) {
            tracing::warn!(error = %e, "Failed to store current alarm");
        }
        self.navigator.navigate(View::Alert(alarm));
        self.alerter.start();
        true
    }

    /// Mark the current alarm as taken and go to the dashboard
    pub async fn take(&self) -> AckOutcome {
        self.acknowledge(Acknowledgement::Take).await
    }

    /// Mark the current alarm as snoozed and stay put
    pub async fn snooze(&self) -> AckOutcome {
        self.acknowledge(Acknowledgement::Snooze).await
    }

    pub async fn acknowledge(&self, ack: Acknowledgement) -> AckOutcome {
        self.alerter.stop();

        let outcome = match self.target() {
            Err(reason) => {
                tracing::debug!(?reason, ?ack, "Nothing to acknowledge");
                AckOutcome::Skipped(reason)
            }
            Ok(id) => {
                self.set_state(AlarmState::Acknowledging);
                let status = ack.status();

                let outcome = match self.api.set_alarm_status(&id, status).await {
                    Ok(_) => {
                        tracing::info!(alarm_id = %id, %status, "Alarm acknowledged");
                        AckOutcome::Updated(status)
                    }
                    Err(e) => {
                        tracing::error!(alarm_id = %id, %status, error = %e, "Failed to update alarm status");
                        AckOutcome::UpdateFailed(e.to_string())
                    }
                };

                if ack == Acknowledgement::Take {
                    self.navigator.navigate(View::Dashboard);
                }
                outcome
            }
        };

        self.set_state(AlarmState::Idle);
        outcome
    }

    /// Id of the stored alarm, if an acknowledgement can be sent at all
    fn target(&self) -> Result<crate::api::RecordId, SkipReason> {
        match self.session.token() {
            Ok(Some(_)) => {}
            _ => return Err(SkipReason::NotAuthenticated),
        }

        let alarm = match self.session.current_alarm() {
            Ok(Some(alarm)) => alarm,
            Ok(None) => return Err(SkipReason::NoCurrentAlarm),
            Err(e) => {
                tracing::warn!(error = %e, "Stored alarm is unreadable");
                return Err(SkipReason::MalformedAlarm);
            }
        };

        alarm.id.ok_or(SkipReason::MissingAlarmId)
    }
}

impl std::fmt::Debug for AlarmController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmController")
            .field("state", &self.state())
            .field("alerter", &self.alerter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::testing::{alarm, FakeAlarmApi, RecordingNavigator};
    use crate::alarm::audio::SilentOutput;
    use crate::api::RecordId;
    use crate::session::{MemoryStore, KeyValueStore, CURRENT_ALARM_KEY};
    use std::time::Duration;

    struct Fixture {
        api: Arc<FakeAlarmApi>,
        navigator: Arc<RecordingNavigator>,
        session: Session,
        controller: AlarmController,
    }

    fn fixture(logged_in: bool) -> Fixture {
        let api = Arc::new(FakeAlarmApi::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Session::in_memory();
        if logged_in {
            session.set_token("tok").unwrap();
        }
        let alerter =
            AudioAlerter::with_output(Duration::from_secs(3), 8_000, Arc::new(SilentOutput));
        let controller =
            AlarmController::new(api.clone(), session.clone(), alerter, navigator.clone());

        Fixture {
            api,
            navigator,
            session,
            controller,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_rings_and_stores_alarm() {
        let f = fixture(true);
        let due = alarm(Some(7), "08:00", None);

        assert!(f.controller.trigger(due.clone()));
        assert_eq!(f.controller.state(), AlarmState::Ringing);
        assert!(f.controller.alerter().is_playing());
        assert_eq!(f.session.current_alarm().unwrap(), Some(due.clone()));
        assert_eq!(f.navigator.views(), vec![View::Alert(due)]);

        // A second alarm cannot take over while ringing
        assert!(!f.controller.trigger(alarm(Some(8), "08:00", None)));
        assert_eq!(f.navigator.views().len(), 1);
        f.controller.alerter().stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_marks_taken_and_navigates() {
        let f = fixture(true);
        f.controller.trigger(alarm(Some(7), "08:00", None));

        let outcome = f.controller.take().await;
        assert_eq!(outcome, AckOutcome::Updated(AlarmStatus::Taken));
        assert_eq!(f.api.updates(), vec![(RecordId::Int(7), AlarmStatus::Taken)]);
        assert!(!f.controller.alerter().is_playing());
        assert_eq!(f.controller.state(), AlarmState::Idle);
        assert_eq!(f.navigator.views().last(), Some(&View::Dashboard));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snooze_marks_snoozed_and_stays() {
        let f = fixture(true);
        f.controller.trigger(alarm(Some(7), "08:00", None));

        let outcome = f.controller.snooze().await;
        assert_eq!(outcome, AckOutcome::Updated(AlarmStatus::Snoozed));
        assert_eq!(f.api.updates(), vec![(RecordId::Int(7), AlarmStatus::Snoozed)]);
        assert!(!f.controller.alerter().is_playing());
        assert!(!f.navigator.views().contains(&View::Dashboard));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_update_is_swallowed() {
        let f = fixture(true);
        f.api.fail_updates();
        f.controller.trigger(alarm(Some(7), "08:00", None));

        let outcome = f.controller.take().await;
        assert!(matches!(outcome, AckOutcome::UpdateFailed(_)));
        assert!(!f.controller.alerter().is_playing());
        assert_eq!(f.controller.state(), AlarmState::Idle);
        assert_eq!(f.navigator.views().last(), Some(&View::Dashboard));
    }

    #[tokio::test]
    async fn test_noop_without_stored_alarm() {
        let f = fixture(true);

        assert_eq!(
            f.controller.take().await,
            AckOutcome::Skipped(SkipReason::NoCurrentAlarm)
        );
        assert_eq!(
            f.controller.snooze().await,
            AckOutcome::Skipped(SkipReason::NoCurrentAlarm)
        );
        assert!(f.api.updates().is_empty());
        assert!(f.navigator.views().is_empty());
    }

    #[tokio::test]
    async fn test_noop_without_alarm_id() {
        let f = fixture(true);
        f.session.set_current_alarm(&alarm(None, "08:00", None)).unwrap();

        assert_eq!(
            f.controller.take().await,
            AckOutcome::Skipped(SkipReason::MissingAlarmId)
        );
        assert!(f.api.updates().is_empty());
        assert!(f.navigator.views().is_empty());
    }

    #[tokio::test]
    async fn test_noop_without_token() {
        let f = fixture(false);
        f.session.set_current_alarm(&alarm(Some(1), "08:00", None)).unwrap();

        assert_eq!(
            f.controller.snooze().await,
            AckOutcome::Skipped(SkipReason::NotAuthenticated)
        );
        assert!(f.api.updates().is_empty());
    }

    #[tokio::test]
    async fn test_noop_with_malformed_snapshot() {
        let store = Arc::new(MemoryStore::new());
        store.set(CURRENT_ALARM_KEY, "not json").unwrap();
        let session = Session::new(store);
        session.set_token("tok").unwrap();

        let api = Arc::new(FakeAlarmApi::default());
        let controller = AlarmController::new(
            api.clone(),
            session,
            AudioAlerter::with_output(Duration::from_secs(3), 8_000, Arc::new(SilentOutput)),
            Arc::new(RecordingNavigator::default()),
        );

        assert_eq!(
            controller.take().await,
            AckOutcome::Skipped(SkipReason::MalformedAlarm)
        );
        assert!(api.updates().is_empty());
    }
}
