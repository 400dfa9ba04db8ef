//! Alarm data model: time tokens, clock times, alarms, and history entries.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, monotonically increasing alarm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlarmId(pub u64);

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Canonical time phrase of the form `H[:MM] AM|PM`.
///
/// Produced by the normalizer and consumed by the scheduler's time resolver.
/// The wrapped string is kept verbatim (digit spacing preserved).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeToken(String);

impl TimeToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Half of the 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock time of day on the 12-hour clock.
///
/// Construct through [`TimeOfDay::new`], which enforces hour 1–12 and minute 0–59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    meridiem: Meridiem,
}

impl TimeOfDay {
    /// Returns `None` when the hour or minute is out of range.
    pub fn new(hour: u8, minute: u8, meridiem: Meridiem) -> Option<Self> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            meridiem,
        })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn meridiem(&self) -> Meridiem {
        self.meridiem
    }

    /// Hour on the 24-hour clock (0–23).
    pub fn hour24(&self) -> u32 {
        let h = u32::from(self.hour) % 12;
        match self.meridiem {
            Meridiem::Am => h,
            Meridiem::Pm => h + 12,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour, self.minute, self.meridiem)
    }
}

/// Lifecycle state of a single alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmState {
    /// Timer counting down.
    Armed,
    /// Timer expired; ringing until the user stops or snoozes.
    Firing,
    /// Re-armed for the snooze delay. Behaves as `Armed` until the snooze
    /// timer expires.
    Snoozed,
    /// Acknowledged by the user. Terminal.
    Stopped,
}

/// A scheduled (task, time) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub id: AlarmId,
    pub task: String,
    pub scheduled_time: TimeOfDay,
    /// The token the alarm was scheduled from, shown to the user verbatim.
    pub token: TimeToken,
    pub created_at: DateTime<Local>,
    pub state: AlarmState,
}

impl Alarm {
    /// Display line used by the alarm list: `"{task} - {token}"`.
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.task, self.token)
    }
}

/// One line of the append-only alarm history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub task: String,
    pub token: TimeToken,
}

impl HistoryEntry {
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.task, self.token)
    }
}
