//! Active alarm registry and append-only alarm history.

use chime_core::alarm::{Alarm, AlarmId, AlarmState, HistoryEntry};

/// Alarms the user can see and remove, in insertion order.
#[derive(Debug, Default)]
pub struct ActiveAlarmRegistry {
    alarms: Vec<Alarm>,
}

impl ActiveAlarmRegistry {
    pub fn push(&mut self, alarm: Alarm) {
        debug_assert!(self.get(alarm.id).is_none(), "duplicate alarm id");
        self.alarms.push(alarm);
    }

    /// Remove the alarm at a 0-based display index.
    pub fn remove(&mut self, index: usize) -> Option<Alarm> {
        (index < self.alarms.len()).then(|| self.alarms.remove(index))
    }

    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    pub fn set_state(&mut self, id: AlarmId, state: AlarmState) -> bool {
        match self.alarms.iter_mut().find(|a| a.id == id) {
            Some(alarm) => {
                alarm.state = state;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.iter()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// `"{task} - {token}"` lines for the alarm list.
    pub fn lines(&self) -> Vec<String> {
        self.alarms.iter().map(Alarm::display_line).collect()
    }
}

/// Every alarm ever scheduled. Never shrinks.
#[derive(Debug, Default)]
pub struct AlarmHistory {
    entries: Vec<HistoryEntry>,
}

impl AlarmHistory {
    pub fn record(&mut self, alarm: &Alarm) {
        self.entries.push(HistoryEntry {
            task: alarm.task.clone(),
            token: alarm.token.clone(),
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::display_line).collect()
    }
}
