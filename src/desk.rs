//! The alarm desk: the single owner task for every piece of alarm state.
//!
//! Console lines and timer expiries both arrive here, so scheduling,
//! removal, ringing, stop and snooze never race each other.


use crate::commands::{help_text, Command};
use chime_core::{
    alarm::Alarm,
    config::{shellexpand, Config},
    notice::Notice,
    traits::{AudioSink, Notifier, Transcriber},
};
use chime_parser::UtteranceParser;
use chime_scheduler::{export::write_history, AlarmEvent, LifecycleController, Scheduler};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Whether the desk keeps running after a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owner of the scheduler, the lifecycle controller and the user-facing collaborators.
pub struct AlarmDesk {
    scheduler: Scheduler,
    lifecycle: LifecycleController,
    parser: UtteranceParser,
    transcriber: Option<Arc<dyn Transcriber>>,
    notifier: Arc<dyn Notifier>,
    history_path: PathBuf,
}

impl AlarmDesk {
    pub fn new(
        config: &Config,
        events: mpsc::Sender<AlarmEvent>,
        audio: Arc<dyn AudioSink>,
        notifier: Arc<dyn Notifier>,
        transcriber: Option<Arc<dyn Transcriber>>,
    ) -> Self {
        Self {
            scheduler: Scheduler::new(events),
            lifecycle: LifecycleController::new(
                audio,
                notifier.clone(),
                config.scheduler.snooze_minutes,
            ),
            parser: UtteranceParser::new(&config.parser),
            transcriber,
            notifier,
            history_path: PathBuf::from(shellexpand(&config.history.export_path)),
        }
    }

    /// Run until `/quit`, end of console input, or Ctrl+C.
    pub async fn run(
        mut self,
        mut lines: mpsc::Receiver<String>,
        mut events: mpsc::Receiver<AlarmEvent>,
    ) {
        info!("alarm desk started");
        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(line) => {
                        if self.handle_line(&line).await == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        info!("console input closed");
                        break;
                    }
                },
                Some(event) = events.recv() => self.handle_event(event),
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }
        self.shutdown();
    }

    /// Handle one console line: a command or an alarm utterance.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let Some(command) = Command::parse(line) else {
            self.submit(line);
            return Flow::Continue;
        };

        match command {
            Command::List => self.show_alarms(),
            Command::Remove(position) => self.remove(position),
            Command::Stop => {
                self.lifecycle.stop(&mut self.scheduler);
            }
            Command::Snooze => {
                self.lifecycle.snooze(&mut self.scheduler);
            }
            Command::Cancel => self.cancel_pending(),
            Command::History => self
                .notifier
                .notify(&Notice::History(self.scheduler.history().lines())),
            Command::Save(path) => self.save_history(path.as_deref()),
            Command::Listen(path) => self.listen(path.as_deref()).await,
            Command::Help => self.notifier.notify(&Notice::Info(help_text().to_string())),
            Command::Quit => return Flow::Quit,
            Command::Unknown(cmd) => self.notifier.notify(&Notice::Warning(format!(
                "Unknown command {cmd}. Type /help for the list."
            ))),
        }
        Flow::Continue
    }

    /// Hand a timer event to the lifecycle controller.
    pub fn handle_event(&mut self, event: AlarmEvent) {
        self.lifecycle.handle_event(&mut self.scheduler, event);
    }

    /// Parse an utterance and schedule the alarm it describes.
    ///
    /// Nothing is scheduled when the time cannot be extracted or resolved.
    pub fn submit(&mut self, utterance: &str) -> Option<Alarm> {
        let result = self
            .parser
            .extract(utterance)
            .into_request()
            .and_then(|(task, token)| self.scheduler.schedule(&task, &token));

        match result {
            Ok(alarm) => {
                self.notifier.notify(&Notice::AlarmSet {
                    task: alarm.task.clone(),
                    token: alarm.token.clone(),
                });
                self.show_alarms();
                Some(alarm)
            }
            Err(e) => {
                warn!("could not schedule {utterance:?}: {e}");
                self.notifier.notify(&Notice::Error(e.user_message()));
                None
            }
        }
    }

    fn show_alarms(&self) {
        self.notifier.show_alarms(&self.scheduler.entries());
    }

    fn remove(&mut self, position: Option<usize>) {
        let Some(position) = position else {
            self.notifier
                .notify(&Notice::Warning("Usage: /remove <n>".to_string()));
            return;
        };
        match position
            .checked_sub(1)
            .and_then(|index| self.scheduler.remove(index))
        {
            Some(_) => self.show_alarms(),
            None => self.notifier.notify(&Notice::Warning(format!(
                "There is no alarm number {position}."
            ))),
        }
    }

    fn cancel_pending(&mut self) {
        let Some(id) = self.scheduler.cancel_pending() else {
            self.notifier
                .notify(&Notice::Warning("No pending alarm to cancel.".to_string()));
            return;
        };
        let task = self
            .scheduler
            .registry()
            .get(id)
            .map(|alarm| alarm.task.clone())
            .unwrap_or_else(|| format!("alarm {id}"));
        self.notifier.notify(&Notice::Cancelled { task });
        self.show_alarms();
    }

    fn save_history(&self, path: Option<&str>) {
        let path = match path {
            Some(path) => PathBuf::from(shellexpand(path)),
            None => self.history_path.clone(),
        };
        match write_history(&path, self.scheduler.history()) {
            Ok(entries) => self.notifier.notify(&Notice::HistorySaved {
                path: path.display().to_string(),
                entries,
            }),
            Err(e) => {
                error!("history export failed: {e}");
                self.notifier.notify(&Notice::Error(e.user_message()));
            }
        }
    }

    async fn listen(&mut self, path: Option<&str>) {
        let Some(path) = path else {
            self.notifier
                .notify(&Notice::Warning("Usage: /listen <audio file>".to_string()));
            return;
        };
        let Some(transcriber) = self.transcriber.clone() else {
            self.notifier.notify(&Notice::Warning(
                "Speech transcription is disabled. Enable [transcription] in config.toml."
                    .to_string(),
            ));
            return;
        };

        let path = PathBuf::from(shellexpand(path));
        let audio = match tokio::fs::read(&path).await {
            Ok(audio) => audio,
            Err(e) => {
                self.notifier.notify(&Notice::Error(format!(
                    "Could not read {}: {e}",
                    path.display()
                )));
                return;
            }
        };

        let file_name = file_name(&path);
        info!("transcribing {} with {}", path.display(), transcriber.name());
        match transcriber.transcribe(&audio, &file_name).await {
            Ok(text) => {
                self.notifier.notify(&Notice::Info(format!("Heard: {text}")));
                self.submit(&text);
            }
            Err(e) => {
                warn!("transcription failed: {e}");
                self.notifier.notify(&Notice::Error(e.user_message()));
            }
        }
    }

    /// Silence the bell and cancel every live timer.
    pub fn shutdown(&mut self) {
        self.lifecycle.silence();
        self.scheduler.shutdown();
        info!("alarm desk stopped");
    }

    #[cfg(test)]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[cfg(test)]
    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string())
}
