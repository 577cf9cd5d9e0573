//! Unix timestamp formatting for date-typed columns.

use chrono::{Local, TimeZone};

use crate::table::FormatKind;

/// Format a unix timestamp (seconds) in the local time zone.
///
/// Returns `None` when the timestamp is outside the representable range.
pub fn format_timestamp(timestamp: i64, kind: FormatKind) -> Option<String> {
    format_timestamp_in(&Local, timestamp, kind)
}

/// Format a unix timestamp (seconds) in an explicit time zone.
pub fn format_timestamp_in<Tz: TimeZone>(tz: &Tz, timestamp: i64, kind: FormatKind) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let datetime = tz.timestamp_opt(timestamp, 0).single()?;
    let pattern = match kind {
        FormatKind::ToDatetime => "%Y-%m-%d %H:%M:%S",
        FormatKind::ToMonthday => "%m月%d日",
    };
    Some(datetime.format(pattern).to_string())
}
