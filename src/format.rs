//! Display formatting for sessions and workspace entries
//!
//! All formatters degrade gracefully: malformed input produces a fallback
//! string, never an error.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Display;

/// Layout of session identifiers (`2024-01-01_09-30-00`)
pub const SESSION_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Placeholder shown when a size or timestamp is unknown
pub const PLACEHOLDER: &str = "-";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Parse the timestamp embedded in a session identifier
pub fn parse_session_timestamp(id: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(id, SESSION_ID_FORMAT).ok()
}

/// Relative date label for a session, measured against the local clock
pub fn session_date_label(id: &str) -> String {
    session_date_label_at(id, Local::now().naive_local())
}

/// Relative date label for a session, measured against `now`
///
/// Whole elapsed days pick the label: 0 is "Today", 1 is "Yesterday",
/// 2 to 6 are "N days ago", anything else is the calendar date.
///
/// # Examples
///
/// ```
/// use agentdesk::format::{parse_session_timestamp, session_date_label_at};
///
/// let now = parse_session_timestamp("2024-01-04_12-00-00").unwrap();
/// assert_eq!(session_date_label_at("2024-01-04_08-00-00", now), "Today");
/// assert_eq!(session_date_label_at("2024-01-03_08-00-00", now), "Yesterday");
/// assert_eq!(session_date_label_at("2024-01-01_08-00-00", now), "3 days ago");
/// assert_eq!(session_date_label_at("not-a-date", now), "not-a-date");
/// ```
pub fn session_date_label_at(id: &str, now: NaiveDateTime) -> String {
    let Some(timestamp) = parse_session_timestamp(id) else {
        return id.to_string();
    };

    match (now - timestamp).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=6 => format!("{} days ago", days),
        _ => timestamp.format("%-m/%-d/%Y").to_string(),
    }
}

/// `HH:MM` embedded in a session identifier, or empty when it does not parse
pub fn session_time_label(id: &str) -> String {
    parse_session_timestamp(id)
        .map(|timestamp| timestamp.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Human-readable byte size
///
/// # Examples
///
/// ```
/// use agentdesk::format::format_size;
///
/// assert_eq!(format_size(Some(512)), "512 B");
/// assert_eq!(format_size(Some(1536)), "1.5 KB");
/// assert_eq!(format_size(Some(3 * 1024 * 1024)), "3.0 MB");
/// assert_eq!(format_size(None), "-");
/// ```
pub fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        None => PLACEHOLDER.to_string(),
        Some(n) if n < KIB => format!("{} B", n),
        Some(n) if n < MIB => format!("{:.1} KB", n as f64 / KIB as f64),
        Some(n) => format!("{:.1} MB", n as f64 / MIB as f64),
    }
}

/// Local date and time for an epoch-seconds timestamp
pub fn format_timestamp(epoch_seconds: Option<f64>) -> String {
    format_timestamp_in(epoch_seconds, &Local)
}

/// Date and time for an epoch-seconds timestamp in the given zone
pub fn format_timestamp_in<Tz>(epoch_seconds: Option<f64>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    epoch_seconds
        .and_then(|seconds| to_datetime(seconds, zone))
        .map(|datetime| datetime.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn to_datetime<Tz: TimeZone>(seconds: f64, zone: &Tz) -> Option<DateTime<Tz>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1_000_000_000.0) as u32;
    zone.timestamp_opt(whole as i64, nanos).single()
}
