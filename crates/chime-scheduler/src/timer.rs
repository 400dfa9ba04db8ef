//! Cancellable one-shot timers that report expiry over a channel.
//!
//! Each armed timer is a tokio task sleeping for its delay. On expiry it
//! sends an [`AlarmEvent`] to the owner loop instead of touching any state.

use chime_core::alarm::AlarmId;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Capacity of the expiry event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Unique identifier of one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Events dispatched from timer tasks to the owner loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmEvent {
    /// A timer ran out. `task` is the text captured when the timer was armed.
    Expired {
        alarm: AlarmId,
        timer: TimerId,
        task: String,
    },
}

/// Handle to an armed timer.
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::cancel`].
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    deadline: Instant,
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Time left before expiry (zero once due).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Stop the timer. A timer that already fired is unaffected.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

/// Arms timers that all report to the same event channel.
#[derive(Debug)]
pub struct TimerFactory {
    next_id: u64,
    events: mpsc::Sender<AlarmEvent>,
}

impl TimerFactory {
    pub fn new(events: mpsc::Sender<AlarmEvent>) -> Self {
        Self { next_id: 1, events }
    }

    /// Arm a one-shot timer. Must be called inside a tokio runtime.
    pub fn arm(&mut self, alarm: AlarmId, task: String, delay: Duration) -> TimerHandle {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let deadline = Instant::now() + delay;
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!("timer {} for alarm {alarm} expired", id.0);
            let event = AlarmEvent::Expired {
                alarm,
                timer: id,
                task,
            };
            if events.send(event).await.is_err() {
                debug!("alarm event receiver dropped, timer {} discarded", id.0);
            }
        });

        TimerHandle {
            id,
            deadline,
            task: handle,
        }
    }
}
