//! Time token parsing and absolute trigger resolution.

use chime_core::alarm::{Meridiem, TimeOfDay, TimeToken};
use chime_core::error::ChimeError;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use std::time::Duration;

/// Parse a token on the 12-hour clock.
///
/// Accepts `H AM`, `H:MM AM`, `HAM` and `H:MMAM` (meridiem in any case, at
/// most one space before it). Missing minutes default to 00.
pub fn parse_time_token(token: &TimeToken) -> Result<TimeOfDay, ChimeError> {
    let invalid = || ChimeError::TimeFormat(token.as_str().to_string());

    let raw = token.as_str().trim();
    if raw.len() < 3 || !raw.is_char_boundary(raw.len() - 2) {
        return Err(invalid());
    }
    let (clock, marker) = raw.split_at(raw.len() - 2);
    let meridiem = match marker.to_ascii_uppercase().as_str() {
        "AM" => Meridiem::Am,
        "PM" => Meridiem::Pm,
        _ => return Err(invalid()),
    };
    let clock = clock.strip_suffix(' ').unwrap_or(clock);

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h, Some(m)),
        None => (clock, None),
    };
    let hour = parse_digits(hour, 1..=2).ok_or_else(invalid)?;
    let minute = match minute {
        Some(m) => parse_digits(m, 2..=2).ok_or_else(invalid)?,
        None => 0,
    };

    TimeOfDay::new(hour, minute, meridiem).ok_or_else(invalid)
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u8> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// The next wall-clock instant at `time`, strictly after `now`.
///
/// Today's occurrence is used unless it is earlier than or equal to `now`,
/// in which case the alarm rolls forward exactly one day.
pub fn next_occurrence(now: NaiveDateTime, time: TimeOfDay) -> NaiveDateTime {
    let today = now
        .date()
        .and_hms_opt(time.hour24(), u32::from(time.minute()), 0)
        .unwrap_or(now);
    if today <= now {
        today + ChronoDuration::days(1)
    } else {
        today
    }
}

/// Non-negative delay from `now` until `target`.
pub fn delay_until(now: NaiveDateTime, target: NaiveDateTime) -> Duration {
    (target - now).to_std().unwrap_or(Duration::ZERO)
}
