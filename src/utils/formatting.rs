//! Formatting utilities used for CLI and export outputs.

use chrono::{DateTime, FixedOffset, Utc};
use regex::Regex;
use std::sync::LazyLock;

static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static ANSI pattern"));

/// Remove ANSI color sequences, e.g. to measure visible width.
pub fn strip_ansi(s: &str) -> String {
    ANSI_RE.replace_all(s, "").into_owned()
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Accumulated study time: "3h 05m", or "12m" below one hour.
pub fn format_accumulated(seconds: i64) -> String {
    let secs = seconds.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Running timer display: "HH:MM:SS".
pub fn format_elapsed(seconds: i64) -> String {
    let secs = seconds.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Short start time in the display offset, e.g. "2/21 14:30".
pub fn format_started_at(dt: &DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).format("%-m/%-d %H:%M").to_string()
}

/// Optional seconds as accumulated time, "--" when absent.
pub fn format_optional_seconds(seconds: Option<i64>) -> String {
    seconds.map(format_accumulated).unwrap_or_else(|| "--".into())
}
