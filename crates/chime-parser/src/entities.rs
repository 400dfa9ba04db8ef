//! TIME/DATE span recognition over raw utterances.
//!
//! A rule-based stand-in for named-entity recognition: it locates the spans a
//! statistical recognizer would label TIME or DATE ("7:30 PM", "3a.m.",
//! "7 in the morning", "noon", "tomorrow", "friday") and reports them in
//! order of appearance. Spans are not normalized here.
//!
//! A clock time directly next to a date or part of day ("7 am tomorrow",
//! "10 PM tonight") is one TIME span, as a trained recognizer would tag it.

use regex_lite::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Entity label, following the usual NER tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Time,
    Date,
}

/// A recognized span of the original utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
    /// Byte range within the utterance.
    pub span: Range<usize>,
}

// Alternatives are tried left to right at each position, so longer clock
// phrases come before their prefixes.
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    let time = [
        r"\d{1,2}(?::\d{2})?(?:\s*o'clock)?\s+(?:in\s+the\s+(?:morning|afternoon|evening)|at\s+night)\b",
        r"\d{1,2}(?::\d{2})?\s?(?:[ap]\.m\.?|[ap]m\b)",
        r"\d{1,2}\s*o'clock\b",
        r"\d{1,2}:\d{2}\b",
        r"(?:noon|midnight)\b",
        r"(?:this|tomorrow)\s+(?:morning|afternoon|evening)\b",
        r"tonight\b",
    ]
    .join("|");
    let date = [
        r"(?:today|tomorrow|yesterday)\b",
        r"(?:mon|tues|wednes|thurs|fri|satur|sun)days?\b",
        r"next\s+(?:week|month|year)\b",
    ]
    .join("|");
    Regex::new(&format!(r"(?i)\b(?:(?P<time>{time})|(?P<date>{date}))"))
        .expect("valid entity regex")
});

/// Recognize TIME/DATE spans in `text`, in order of appearance.
pub fn recognize(text: &str) -> Vec<Entity> {
    let mut merged: Vec<Entity> = Vec::new();
    for entity in raw_spans(text) {
        match merged.last_mut() {
            Some(prev) if adjoins(text, prev, &entity) => {
                prev.label = EntityLabel::Time;
                prev.span = prev.span.start..entity.span.end;
                prev.text = text[prev.span.clone()].to_string();
            }
            _ => merged.push(entity),
        }
    }
    merged
}

/// Only whitespace between the two spans, and at most one of them is a clock reading.
fn adjoins(text: &str, prev: &Entity, next: &Entity) -> bool {
    let has_digit = |e: &Entity| e.text.chars().any(|c| c.is_ascii_digit());
    (prev.label == EntityLabel::Time || next.label == EntityLabel::Time)
        && !(has_digit(prev) && has_digit(next))
        && text[prev.span.end..next.span.start]
            .chars()
            .all(char::is_whitespace)
}

fn raw_spans(text: &str) -> Vec<Entity> {
    ENTITY
        .captures_iter(text)
        .filter_map(|caps| {
            let (label, m) = match (caps.name("time"), caps.name("date")) {
                (Some(m), _) => (EntityLabel::Time, m),
                (None, Some(m)) => (EntityLabel::Date, m),
                (None, None) => return None,
            };
            Some(Entity {
                label,
                text: m.as_str().to_string(),
                span: m.range(),
            })
        })
        .collect()
}
