//! Calendar helpers. "Today" is always taken in one fixed UTC offset
//! (Asia/Seoul by default) regardless of the machine's local timezone.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, SecondsFormat, Utc};

pub const DB_DATE_FMT: &str = "%Y-%m-%d";

/// Asia/Seoul has no daylight saving time, so a fixed offset is exact.
pub const DEFAULT_UTC_OFFSET: &str = "+09:00";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DB_DATE_FMT).ok()
}

/// Calendar date of `now` in the given offset.
pub fn date_in(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

pub fn today_in(offset: FixedOffset) -> NaiveDate {
    date_in(Utc::now(), offset)
}

/// Parse "+09:00", "-05:30", "+0900", "Z" or "UTC".
pub fn parse_utc_offset(s: &str) -> AppResult<FixedOffset> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("z") || t.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }
    t.parse::<FixedOffset>()
        .map_err(|_| AppError::InvalidOffset(s.to_string()))
}

/// Timestamps are stored as RFC 3339 UTC with millisecond precision, so that
/// text ordering matches chronological ordering.
pub fn to_db_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_db_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
