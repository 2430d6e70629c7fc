//! Best-effort conversion of raw date/time tokens into epoch milliseconds.
//!
//! Dates are read month-first (`M/D/Y`), two-digit years are expanded with
//! chrono's `%y` rules, and the result is interpreted as UTC. Failure is
//! normal and yields `None`.

use chrono::NaiveDateTime;

/// Formats tried in order against `"{date} {time}"`.
///
/// Two-digit years must come first: `%Y` happily reads `23` as year 23.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Parses raw `date` and `time` tokens into epoch milliseconds.
///
/// # Example
///
/// ```rust
/// use chatarchive::parsing::parse_timestamp;
///
/// assert_eq!(parse_timestamp("1/1/24", "0:00"), Some(1_704_067_200_000));
/// assert_eq!(parse_timestamp("13/45/24", "10:30"), None);
/// ```
pub fn parse_timestamp(date: &str, time: &str) -> Option<i64> {
    let datetime = format!("{} {}", date.trim(), normalize_time(time));

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&datetime, fmt).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Collapses exotic spaces and separates a glued AM/PM marker.
fn normalize_time(time: &str) -> String {
    let mut normalized: String = time
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let len = normalized.len();
    if len > 2 && normalized.is_char_boundary(len - 2) {
        let (head, tail) = normalized.split_at(len - 2);
        let is_meridiem = tail.eq_ignore_ascii_case("am") || tail.eq_ignore_ascii_case("pm");
        if is_meridiem && !head.ends_with(' ') {
            normalized = format!("{head} {tail}");
        }
    }

    normalized
}
