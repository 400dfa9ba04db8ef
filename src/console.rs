//! Terminal collaborators: printed notices and a bell for the alarm sound.

use chime_core::{
    error::ChimeError,
    notice::Notice,
    traits::{AudioSink, Notifier},
};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Prints notices and the alarm list to stdout.
pub struct ConsoleNotifier {
    name: String,
}

impl ConsoleNotifier {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Numbered alarm list as shown on the console.
pub fn render_alarm_list(entries: &[String]) -> String {
    if entries.is_empty() {
        return "No active alarms.".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}. {entry}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        println!("\n[{} | {}]\n{notice}\n", self.name, notice.title());
    }

    fn show_alarms(&self, entries: &[String]) {
        println!("Active alarms:\n{}\n", render_alarm_list(entries));
    }
}

/// Rings the terminal bell until stopped.
pub struct BellAudio {
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BellAudio {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
            task: Mutex::new(None),
        }
    }
}

fn ring() {
    let mut out = std::io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

impl AudioSink for BellAudio {
    fn play(&self, looped: bool) -> Result<(), ChimeError> {
        if !looped {
            ring();
            return Ok(());
        }
        let mut task = self
            .task
            .lock()
            .map_err(|_| ChimeError::Audio("bell state poisoned".to_string()))?;
        if let Some(previous) = task.take() {
            previous.abort();
        }
        let interval = self.interval;
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                ring();
            }
        }));
        debug!("bell started ({}s interval)", interval.as_secs());
        Ok(())
    }

    fn stop(&self) {
        if let Ok(mut task) = self.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
                debug!("bell stopped");
            }
        }
    }
}

/// Audio sink used when sound is disabled.
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&self, _looped: bool) -> Result<(), ChimeError> {
        Ok(())
    }

    fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_alarm_list() {
        assert_eq!(render_alarm_list(&[]), "No active alarms.");
        let entries = vec!["run - 7 AM".to_string(), "call mom - 7:30 PM".to_string()];
        assert_eq!(
            render_alarm_list(&entries),
            "1. run - 7 AM\n2. call mom - 7:30 PM"
        );
    }

    #[tokio::test]
    async fn test_bell_start_and_stop() {
        let bell = BellAudio::new(1);
        bell.play(true).unwrap();
        assert!(bell.task.lock().unwrap().is_some());
        bell.stop();
        assert!(bell.task.lock().unwrap().is_none());
        // Stopping silence is a no-op.
        bell.stop();
    }
}
