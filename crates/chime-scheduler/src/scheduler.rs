//! The alarm scheduler: owns the registry, the history, and every live timer.

use crate::registry::{ActiveAlarmRegistry, AlarmHistory};
use crate::resolve::{delay_until, next_occurrence, parse_time_token};
use crate::timer::{AlarmEvent, TimerFactory, TimerHandle, TimerId};
use chime_core::alarm::{Alarm, AlarmId, AlarmState, TimeToken};
use chime_core::error::ChimeError;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The most recently armed timer (new alarm or snooze).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTrigger {
    pub alarm: AlarmId,
    pub timer: TimerId,
}

/// Alarm scheduler.
///
/// All mutation goes through `&mut self`, so the scheduler lives on a single
/// owner task. Timer expiries come back as [`AlarmEvent`]s on the channel
/// passed to [`Scheduler::new`] and must be confirmed with
/// [`Scheduler::accept_expiry`].
#[derive(Debug)]
pub struct Scheduler {
    registry: ActiveAlarmRegistry,
    history: AlarmHistory,
    timers: HashMap<AlarmId, TimerHandle>,
    pending: Option<PendingTrigger>,
    factory: TimerFactory,
    next_alarm_id: u64,
}

impl Scheduler {
    pub fn new(events: mpsc::Sender<AlarmEvent>) -> Self {
        Self {
            registry: ActiveAlarmRegistry::default(),
            history: AlarmHistory::default(),
            timers: HashMap::new(),
            pending: None,
            factory: TimerFactory::new(events),
            next_alarm_id: 1,
        }
    }

    /// Schedule `task` at the next occurrence of `token` after the current local time.
    pub fn schedule(&mut self, task: &str, token: &TimeToken) -> Result<Alarm, ChimeError> {
        self.schedule_at(task, token, Local::now())
    }

    /// Schedule relative to an explicit `now`.
    ///
    /// Either the alarm is fully registered (registry, history, live timer)
    /// or nothing changes.
    pub fn schedule_at(
        &mut self,
        task: &str,
        token: &TimeToken,
        now: DateTime<Local>,
    ) -> Result<Alarm, ChimeError> {
        let time = parse_time_token(token)?;
        let target = next_occurrence(now.naive_local(), time);
        let delay = delay_until(now.naive_local(), target);

        let id = AlarmId(self.next_alarm_id);
        self.next_alarm_id += 1;

        let alarm = Alarm {
            id,
            task: task.to_string(),
            scheduled_time: time,
            token: token.clone(),
            created_at: now,
            state: AlarmState::Armed,
        };

        self.arm(id, task.to_string(), delay);
        self.registry.push(alarm.clone());
        self.history.record(&alarm);

        info!(
            "alarm {id} scheduled: {} at {target} (in {}s)",
            alarm.display_line(),
            delay.as_secs()
        );
        Ok(alarm)
    }

    /// Arm a snooze timer for an alarm that just rang.
    ///
    /// The alarm does not have to be in the registry any more; its task text
    /// is carried by the timer.
    pub fn snooze(&mut self, alarm: AlarmId, task: &str, delay: Duration) -> TimerId {
        let timer = self.arm(alarm, task.to_string(), delay);
        info!("alarm {alarm} snoozed for {}s", delay.as_secs());
        timer
    }

    fn arm(&mut self, alarm: AlarmId, task: String, delay: Duration) -> TimerId {
        let handle = self.factory.arm(alarm, task, delay);
        let timer = handle.id();
        if let Some(previous) = self.timers.insert(alarm, handle) {
            previous.cancel();
        }
        self.pending = Some(PendingTrigger { alarm, timer });
        timer
    }

    /// Confirm that an expiry event belongs to the live timer of its alarm.
    ///
    /// Returns `false` for stale events from timers cancelled after they sent.
    /// On success the timer is retired and the alarm marked [`AlarmState::Firing`].
    pub fn accept_expiry(&mut self, alarm: AlarmId, timer: TimerId) -> bool {
        match self.timers.get(&alarm) {
            Some(handle) if handle.id() == timer => {}
            _ => {
                debug!("ignoring stale expiry of timer {} for alarm {alarm}", timer.0);
                return false;
            }
        }
        self.timers.remove(&alarm);
        if self.pending.is_some_and(|p| p.timer == timer) {
            self.pending = None;
        }
        self.registry.set_state(alarm, AlarmState::Firing);
        true
    }

    /// Record a lifecycle state change on the registry entry, if it still exists.
    pub fn set_state(&mut self, alarm: AlarmId, state: AlarmState) -> bool {
        self.registry.set_state(alarm, state)
    }

    /// Remove the alarm at a 0-based display index and cancel its timer.
    ///
    /// An out-of-range index is a no-op. History is never touched.
    pub fn remove(&mut self, index: usize) -> Option<Alarm> {
        let Some(alarm) = self.registry.remove(index) else {
            warn!("remove: no alarm at index {index}");
            return None;
        };
        if let Some(handle) = self.timers.remove(&alarm.id) {
            handle.cancel();
            if self.pending.is_some_and(|p| p.timer == handle.id()) {
                self.pending = None;
            }
        }
        info!("alarm {} removed: {}", alarm.id, alarm.display_line());
        Some(alarm)
    }

    /// Cancel the most recently armed timer, if it has not fired yet.
    ///
    /// Returns the cancelled alarm's id; the alarm stays listed as stopped.
    pub fn cancel_pending(&mut self) -> Option<AlarmId> {
        let pending = self.pending.take()?;
        match self.timers.get(&pending.alarm) {
            Some(handle) if handle.id() == pending.timer => {}
            _ => return None,
        }
        if let Some(handle) = self.timers.remove(&pending.alarm) {
            handle.cancel();
            info!(
                "pending timer for alarm {} cancelled {}s before expiry",
                pending.alarm,
                handle.remaining().as_secs()
            );
        }
        self.registry.set_state(pending.alarm, AlarmState::Stopped);
        Some(pending.alarm)
    }

    pub fn registry(&self) -> &ActiveAlarmRegistry {
        &self.registry
    }

    pub fn history(&self) -> &AlarmHistory {
        &self.history
    }

    pub fn pending(&self) -> Option<PendingTrigger> {
        self.pending
    }

    /// Live timer for an alarm, if armed.
    pub fn timer(&self, alarm: AlarmId) -> Option<&TimerHandle> {
        self.timers.get(&alarm)
    }

    /// Number of timers currently armed.
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// `"{task} - {token}"` lines for the alarm list.
    pub fn entries(&self) -> Vec<String> {
        self.registry.lines()
    }

    /// Cancel every live timer (shutdown).
    pub fn shutdown(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.cancel();
        }
        self.pending = None;
    }
}
