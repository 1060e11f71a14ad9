//! Alarm Poller
//!
//! Periodically fetches the alarm list and hands the first due alarm to the
//! [`AlarmController`]. An alarm is due when its scheduled "HH:MM" equals the
//! current local minute and its status is unset or `upcoming`.
//!
//! Polls run every few seconds, so the same alarm matches several polls in
//! its minute. The poller remembers which alarms it already fired in the
//! current minute and fires each of them only once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::clock::{minute_of, normalize_scheduled_time, Clock};
use super::controller::AlarmController;
use super::AlarmApi;
use crate::api::Alarm;

/// What a single poll did
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No alarm is due this minute
    Idle,
    /// An alarm fired and the controller is now ringing
    Triggered(Alarm),
    /// Due alarms exist but all of them already fired this minute
    AlreadyFired,
    /// An alarm is due but another one is still ringing
    Busy,
    /// Fetching alarms failed; the next poll tries again
    Failed(String),
}

/// Alarms fired during one wall-clock minute
#[derive(Debug, Default)]
struct FiredMinute {
    minute: String,
    keys: HashSet<String>,
}

pub struct AlarmPoller {
    api: Arc<dyn AlarmApi>,
    clock: Arc<dyn Clock>,
    controller: Arc<AlarmController>,
    interval: Duration,
    fired: Mutex<FiredMinute>,
}

impl AlarmPoller {
    pub fn new(
        api: Arc<dyn AlarmApi>,
        clock: Arc<dyn Clock>,
        controller: Arc<AlarmController>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            clock,
            controller,
            interval,
            fired: Mutex::new(FiredMinute::default()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one poll: fetch, match against the current minute, maybe trigger
    pub async fn poll_once(&self) -> PollOutcome {
        let alarms = match self.api.fetch_alarms().await {
            Ok(alarms) => alarms,
            Err(e) => {
                tracing::warn!(error = %e, "Alarm poll failed");
                return PollOutcome::Failed(e.to_string());
            }
        };

        let now = self.clock.now();
        let minute = minute_of(now);
        let stamp = format!("{} {}", now.date(), minute);

        let due: Vec<Alarm> = alarms
            .into_iter()
            .filter(|a| a.is_pending())
            .filter(|a| normalize_scheduled_time(&a.scheduled_time).as_deref() == Some(minute.as_str()))
            .collect();

        if due.is_empty() {
            tracing::trace!(%minute, "No alarm due");
            return PollOutcome::Idle;
        }

        let Ok(mut fired) = self.fired.lock() else {
            return PollOutcome::Busy;
        };
        if fired.minute != stamp {
            fired.minute = stamp;
            fired.keys.clear();
        }

        let Some(alarm) = due.into_iter().find(|a| !fired.keys.contains(&alarm_key(a))) else {
            return PollOutcome::AlreadyFired;
        };

        if self.controller.trigger(alarm.clone()) {
            fired.keys.insert(alarm_key(&alarm));
            PollOutcome::Triggered(alarm)
        } else {
            tracing::debug!(medication = %alarm.medication_name, "Alarm due while another is ringing");
            PollOutcome::Busy
        }
    }

    /// Spawn the polling loop. The first poll runs immediately.
    pub fn start(self: Arc<Self>) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        tracing::info!(interval_secs = self.interval.as_secs(), "Starting alarm poller");

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = self.poll_once().await;
                        tracing::debug!(?outcome, "Alarm poll finished");
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }

            tracing::info!("Alarm poller stopped");
        });

        PollerHandle { shutdown_tx, task }
    }
}

fn alarm_key(alarm: &Alarm) -> String {
    match &alarm.id {
        Some(id) => format!("id:{}", id),
        None => format!("name:{}@{}", alarm.medication_name, alarm.scheduled_time),
    }
}

/// Handle to a running poller. Dropping it also stops the loop.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the loop to exit
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Alarm poller task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
