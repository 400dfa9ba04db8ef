//! # chime-scheduler
//!
//! Alarm scheduling and lifecycle.
//!
//! - `resolve`: time token parsing and next-occurrence math
//! - `timer`: cancellable one-shot timers reporting over a channel
//! - `registry`: active alarms and append-only history
//! - `scheduler`: the owner of registry, history, and timers
//! - `lifecycle`: ringing, stop, and snooze
//! - `export`: plain-text history export

pub mod export;
pub mod lifecycle;
pub mod registry;
pub mod resolve;
pub mod scheduler;
pub mod timer;

#[cfg(test)]
mod tests;

pub use lifecycle::LifecycleController;
pub use scheduler::{PendingTrigger, Scheduler};
pub use timer::{AlarmEvent, TimerId, EVENT_CHANNEL_CAPACITY};
