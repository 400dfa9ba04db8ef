use crate::alarm::TimeToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-facing notification emitted by the alarm desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// An alarm was scheduled.
    AlarmSet { task: String, token: TimeToken },
    /// An alarm is ringing.
    Firing { task: String },
    /// The ringing alarm was stopped.
    Stopped,
    /// The ringing alarm was snoozed.
    Snoozed { minutes: u64 },
    /// A pending timer was cancelled.
    Cancelled { task: String },
    /// Every alarm scheduled this session, oldest first.
    History(Vec<String>),
    /// Alarm history was written to disk.
    HistorySaved { path: String, entries: usize },
    /// Plain information (help, transcripts).
    Info(String),
    /// Recoverable user-facing problem.
    Warning(String),
    /// An operation failed.
    Error(String),
}

impl Notice {
    /// Short dialog title, mirroring a message box caption.
    pub fn title(&self) -> &'static str {
        match self {
            Self::AlarmSet { .. } => "Alarm Set",
            Self::Firing { .. } => "Alarm",
            Self::Stopped => "Alarm Stopped",
            Self::Snoozed { .. } => "Snoozed",
            Self::Cancelled { .. } => "Cancelled",
            Self::History(_) => "Alarm History",
            Self::HistorySaved { .. } => "Success",
            Self::Info(_) => "Info",
            Self::Warning(_) => "Warning",
            Self::Error(_) => "Error",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlarmSet { task, token } => write!(f, "Task: {task}\nTime: {token}"),
            Self::Firing { task } => write!(f, "Alarm: {task}\n\nUse /stop or /snooze."),
            Self::Stopped => f.write_str("The alarm has been stopped."),
            Self::Snoozed { minutes } => {
                write!(f, "The alarm has been snoozed for {minutes} minutes.")
            }
            Self::Cancelled { task } => write!(f, "Pending alarm cancelled: {task}"),
            Self::History(lines) if lines.is_empty() => f.write_str("No alarms scheduled yet."),
            Self::History(lines) => f.write_str(&lines.join("\n")),
            Self::HistorySaved { path, entries } => {
                write!(f, "Alarm history saved successfully! ({entries} entries to {path})")
            }
            Self::Info(msg) | Self::Warning(msg) | Self::Error(msg) => f.write_str(msg),
        }
    }
}
