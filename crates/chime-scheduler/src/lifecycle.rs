//! Alarm lifecycle: Armed → Firing → {Stopped | Snoozed}. Snoozed is the
//! re-armed state and fires again like Armed.
//!
//! The controller runs on the owner task. It turns confirmed timer expiries
//! into ringing alarms, drives the audio and notification collaborators, and
//! answers the user's stop/snooze actions.

use crate::scheduler::Scheduler;
use crate::timer::{AlarmEvent, TimerId};
use chime_core::alarm::{AlarmId, AlarmState};
use chime_core::notice::Notice;
use chime_core::traits::{AudioSink, Notifier};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Inputs that move an alarm between lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleInput {
    Expire,
    Stop,
    Snooze,
}

/// Next state for `input`, or `None` when the transition is not allowed.
pub fn transition(state: AlarmState, input: LifecycleInput) -> Option<AlarmState> {
    use AlarmState::*;
    use LifecycleInput::*;
    match (state, input) {
        (Armed | Snoozed, Expire) => Some(Firing),
        (Firing, Stop) => Some(Stopped),
        (Firing, Snooze) => Some(Snoozed),
        _ => None,
    }
}

/// An alarm currently ringing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ringing {
    pub alarm: AlarmId,
    pub task: String,
}

/// Drives ringing alarms and the user's responses to them.
pub struct LifecycleController {
    ringing: VecDeque<Ringing>,
    audio: Arc<dyn AudioSink>,
    notifier: Arc<dyn Notifier>,
    snooze_delay: Duration,
}

impl LifecycleController {
    pub fn new(
        audio: Arc<dyn AudioSink>,
        notifier: Arc<dyn Notifier>,
        snooze_minutes: u64,
    ) -> Self {
        Self {
            ringing: VecDeque::new(),
            audio,
            notifier,
            snooze_delay: Duration::from_secs(snooze_minutes * 60),
        }
    }

    pub fn snooze_delay(&self) -> Duration {
        self.snooze_delay
    }

    /// Alarms ringing now, oldest first.
    pub fn ringing(&self) -> impl Iterator<Item = &Ringing> {
        self.ringing.iter()
    }

    pub fn is_firing(&self) -> bool {
        !self.ringing.is_empty()
    }

    /// Handle a timer event on the owner task. Stale events are ignored.
    ///
    /// Returns `true` when the event started an alarm ringing.
    pub fn handle_event(&mut self, scheduler: &mut Scheduler, event: AlarmEvent) -> bool {
        match event {
            AlarmEvent::Expired { alarm, timer, task } => {
                self.on_expired(scheduler, alarm, timer, task)
            }
        }
    }

    fn on_expired(
        &mut self,
        scheduler: &mut Scheduler,
        alarm: AlarmId,
        timer: TimerId,
        task: String,
    ) -> bool {
        if !scheduler.accept_expiry(alarm, timer) {
            return false;
        }
        info!("alarm {alarm} firing: {task}");

        if self.ringing.is_empty() {
            self.start_audio();
        }
        self.notifier.notify(&Notice::Firing { task: task.clone() });
        self.ringing.push_back(Ringing { alarm, task });
        true
    }

    /// Stop the oldest ringing alarm. It stays listed and in history.
    pub fn stop(&mut self, scheduler: &mut Scheduler) -> Option<AlarmId> {
        let ringing = self.take_ringing("stop")?;
        scheduler.set_state(ringing.alarm, advance(AlarmState::Firing, LifecycleInput::Stop));
        self.notifier.notify(&Notice::Stopped);
        info!("alarm {} stopped", ringing.alarm);
        self.resume_next();
        Some(ringing.alarm)
    }

    /// Snooze the oldest ringing alarm: re-arm it with the same task after the snooze delay.
    pub fn snooze(&mut self, scheduler: &mut Scheduler) -> Option<TimerId> {
        let ringing = self.take_ringing("snooze")?;
        let timer = scheduler.snooze(ringing.alarm, &ringing.task, self.snooze_delay);
        scheduler.set_state(
            ringing.alarm,
            advance(AlarmState::Firing, LifecycleInput::Snooze),
        );
        self.notifier.notify(&Notice::Snoozed {
            minutes: self.snooze_delay.as_secs() / 60,
        });
        self.resume_next();
        Some(timer)
    }

    /// Silence everything (shutdown).
    pub fn silence(&mut self) {
        if !self.ringing.is_empty() {
            self.audio.stop();
            self.ringing.clear();
        }
    }

    fn take_ringing(&mut self, action: &str) -> Option<Ringing> {
        match self.ringing.pop_front() {
            Some(ringing) => {
                self.audio.stop();
                Some(ringing)
            }
            None => {
                warn!("{action}: no alarm is ringing");
                self.notifier
                    .notify(&Notice::Warning("No alarm is ringing.".to_string()));
                None
            }
        }
    }

    /// Keep ringing for the next queued alarm, if any.
    fn resume_next(&mut self) {
        if let Some(next) = self.ringing.front() {
            let task = next.task.clone();
            self.start_audio();
            self.notifier.notify(&Notice::Firing { task });
        }
    }

    fn start_audio(&self) {
        if let Err(e) = self.audio.play(true) {
            error!("alarm sound failed: {e}");
            self.notifier.notify(&Notice::Error(e.user_message()));
        }
    }
}

fn advance(state: AlarmState, input: LifecycleInput) -> AlarmState {
    transition(state, input).unwrap_or(state)
}
