//! Dose Alarms
//!
//! Polling for due alarms, the audible alert, and acknowledgement.
//!
//! ## Architecture
//!
//! - **Clock**: injected wall clock, so trigger timing is testable
//! - **AlarmPoller**: cancellable background task matching alarms to the current minute
//! - **AlarmController**: idle / ringing / acknowledging state machine
//! - **AudioAlerter**: repeating two-tone beep while ringing
//!
//! ## Data Flow
//!
//! 1. The poller fetches `GET /alarms` every poll interval
//! 2. A pending alarm scheduled for the current minute is handed to the controller
//! 3. The controller stores it in the session, shows the alert and starts the beep
//! 4. Take or snooze stops the beep and sends `PUT /alarms/{id}`

mod audio;
mod clock;
mod controller;
mod poller;

pub use audio::{
    AudioAlerter, AudioContext, AudioError, AudioOutput, BeepPattern, SilentOutput, TerminalBell,
    ToneBurst, TONE_FREQUENCIES,
};
pub use clock::{minute_of, normalize_scheduled_time, Clock, ManualClock, SystemClock};
pub use controller::{
    AckOutcome, Acknowledgement, AlarmController, AlarmState, Navigator, SkipReason, View,
};
pub use poller::{AlarmPoller, PollOutcome, PollerHandle};

use async_trait::async_trait;

use crate::api::{Alarm, AlarmStatus, AlarmUpdate, ApiClient, ApiResult, RecordId};

/// The slice of the API the alarm workflow needs
#[async_trait]
pub trait AlarmApi: Send + Sync {
    async fn fetch_alarms(&self) -> ApiResult<Vec<Alarm>>;

    async fn set_alarm_status(&self, id: &RecordId, status: AlarmStatus) -> ApiResult<Alarm>;
}

#[async_trait]
impl AlarmApi for ApiClient {
    async fn fetch_alarms(&self) -> ApiResult<Vec<Alarm>> {
        self.list_alarms().await
    }

    async fn set_alarm_status(&self, id: &RecordId, status: AlarmStatus) -> ApiResult<Alarm> {
        self.update_alarm(id, &AlarmUpdate::status(status)).await
    }
}
