use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ChimeError;

/// Top-level Chime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chime: ChimeConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChimeConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write logs to a daily-rolling file under `{data_dir}/logs`.
    #[serde(default)]
    pub log_to_file: bool,
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_to_file: false,
        }
    }
}

/// Which recognized TIME/DATE span decides the alarm time when an utterance has several.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySelection {
    /// The last span visited wins, even when it does not normalize to a time.
    #[default]
    Last,
    /// The last span that normalizes to a time wins.
    LastResolved,
}

impl EntitySelection {
    /// Human-readable name for display (e.g. in `chime status`).
    pub fn display_name(&self) -> &str {
        match self {
            Self::Last => "last",
            Self::LastResolved => "last_resolved",
        }
    }
}

/// Utterance parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub entity_selection: EntitySelection,
    /// Task used when no words survive filtering.
    #[serde(default = "default_task")]
    pub default_task: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            entity_selection: EntitySelection::default(),
            default_task: default_task(),
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            snooze_minutes: default_snooze_minutes(),
        }
    }
}

/// Alarm sound settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between terminal bell rings while an alarm is firing.
    #[serde(default = "default_bell_interval")]
    pub bell_interval_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell_interval_secs: default_bell_interval(),
        }
    }
}

/// Whisper speech-to-text config.
///
/// `api_key` falls back to the `OPENAI_API_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_whisper_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            model: default_whisper_model(),
            base_url: default_openai_base_url(),
        }
    }
}

impl TranscriptionConfig {
    /// The configured API key, or `OPENAI_API_KEY` when the config leaves it empty.
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    }
}

/// History export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_export_path")]
    pub export_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            export_path: default_export_path(),
        }
    }
}

// --- Default value functions ---

fn default_name() -> String {
    "Chime".to_string()
}
fn default_data_dir() -> String {
    "~/.chime".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_task() -> String {
    "Reminder".to_string()
}
fn default_snooze_minutes() -> u64 {
    5
}
fn default_bell_interval() -> u64 {
    2
}
fn default_whisper_model() -> String {
    "whisper-1".to_string()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_export_path() -> String {
    "~/.chime/alarm_history.txt".to_string()
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file, falling back to defaults when it is missing.
pub fn load(path: &str) -> Result<Config, ChimeError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ChimeError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| ChimeError::Config(format!("failed to parse config: {}", e)))?;

    if config.scheduler.snooze_minutes == 0 {
        return Err(ChimeError::Config(
            "scheduler.snooze_minutes must be at least 1".to_string(),
        ));
    }

    Ok(config)
}
