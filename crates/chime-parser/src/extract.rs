//! Utterance parsing: (time token, task) from a raw command.

use crate::entities::{self, Entity};
use crate::normalize::normalize;
use crate::tagger;
use chime_core::alarm::TimeToken;
use chime_core::config::{EntitySelection, ParserConfig};
use chime_core::error::ChimeError;
use regex_lite::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Words never kept in a task description.
const TASK_STOP_WORDS: &[&str] = &[
    "set", "alarm", "reminder", "for", "at", "on", "me", "wake", "up",
];

/// Literal am/pm markers, with or without periods.
static MERIDIEM_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:[ap]\.m\.?|[ap]m\b)").expect("valid meridiem regex")
});

/// Result of parsing one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Normalized time, or `None` when no usable time phrase was found.
    pub time: Option<TimeToken>,
    /// Task description; never empty.
    pub task: String,
}

impl Extraction {
    /// Split into a schedulable (task, time) pair.
    ///
    /// A missing time is an extraction error: nothing may be scheduled.
    pub fn into_request(self) -> Result<(String, TimeToken), ChimeError> {
        match self.time {
            Some(time) if !self.task.is_empty() => Ok((self.task, time)),
            _ => Err(ChimeError::Extraction(
                "Could not extract time and task properly.".to_string(),
            )),
        }
    }
}

/// Configured utterance parser.
#[derive(Debug, Clone)]
pub struct UtteranceParser {
    selection: EntitySelection,
    default_task: String,
}

impl Default for UtteranceParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl UtteranceParser {
    pub fn new(config: &ParserConfig) -> Self {
        let default_task = if config.default_task.trim().is_empty() {
            ParserConfig::default().default_task
        } else {
            config.default_task.trim().to_string()
        };
        Self {
            selection: config.entity_selection,
            default_task,
        }
    }

    /// Parse an utterance into a time token and a task description.
    pub fn extract(&self, utterance: &str) -> Extraction {
        let entities = entities::recognize(utterance);
        let time = self.select_time(&entities);
        let task = self.extract_task(utterance);
        debug!(
            "parsed utterance: {} span(s), time={:?}, task={task:?}",
            entities.len(),
            time.as_ref().map(TimeToken::as_str)
        );
        Extraction { time, task }
    }

    fn select_time(&self, entities: &[Entity]) -> Option<TimeToken> {
        match self.selection {
            EntitySelection::Last => entities
                .iter()
                .fold(None, |_, entity| normalize(&entity.text)),
            EntitySelection::LastResolved => {
                entities.iter().rev().find_map(|entity| normalize(&entity.text))
            }
        }
    }

    fn extract_task(&self, utterance: &str) -> String {
        let cleaned = MERIDIEM_MARKER.replace_all(utterance, "");
        let words: Vec<String> = tagger::tag(&cleaned)
            .into_iter()
            .filter(|token| token.tag.is_content())
            .filter(|token| !TASK_STOP_WORDS.contains(&token.text.to_lowercase().as_str()))
            .filter(|token| !token.text.chars().any(|c| c.is_ascii_digit()))
            .map(|token| token.text)
            .collect();

        if words.is_empty() {
            self.default_task.clone()
        } else {
            words.join(" ")
        }
    }
}

/// Parse an utterance with the default parser settings.
pub fn extract(utterance: &str) -> Extraction {
    UtteranceParser::default().extract(utterance)
}
