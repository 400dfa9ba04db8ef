//! Time phrase normalization: raw spoken text → `H[:MM] AM|PM`.

use chime_core::alarm::TimeToken;
use regex_lite::{Captures, Regex};
use std::sync::LazyLock;

/// Spoken qualifiers rewritten to a meridiem (or a full clock time), in order.
static QUALIFIERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bin\s+the\s+morning\b", "AM"),
        (r"(?i)\bin\s+the\s+(?:evening|afternoon)\b", "PM"),
        (r"(?i)\bat\s+night\b", "PM"),
        (r"(?i)\s*\bo'clock\b", ""),
        (r"(?i)\bnoon\b", "12 PM"),
        (r"(?i)\bmidnight\b", "12 AM"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("valid qualifier regex"),
            replacement,
        )
    })
    .collect()
});

/// A digit glued to a dotted marker, e.g. `3a.m.`.
static GLUED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d)([ap]\.m\.?)").expect("valid marker regex"));

/// Dotted meridiem spellings: `a.m.`, `p.m`, `A.M.`.
static DOTTED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([ap])\.m\b\.?").expect("valid marker regex"));

static TIME_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s?(?:am|pm)\b").expect("valid time regex")
});

/// Canonicalize raw time-related text into a time token.
///
/// Returns the first `H[:MM] AM|PM` phrase found after rewriting spoken
/// qualifiers and dotted markers, or `None` when the text holds no time.
/// Digit spacing is preserved; the meridiem is upper-cased.
pub fn normalize(raw: &str) -> Option<TimeToken> {
    let mut text = raw.to_string();
    for (re, replacement) in QUALIFIERS.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text = GLUED_MARKER.replace_all(&text, "${1} ${2}").into_owned();
    text = DOTTED_MARKER
        .replace_all(&text, |caps: &Captures| {
            format!("{}M", caps[1].to_ascii_uppercase())
        })
        .into_owned();

    let found = TIME_PHRASE.find(&text)?.as_str();
    let (digits, meridiem) = found.split_at(found.len() - 2);
    Some(TimeToken::new(format!(
        "{digits}{}",
        meridiem.to_ascii_uppercase()
    )))
}
