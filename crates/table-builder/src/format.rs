//! Value formatting for table cells.
//!
//! Precedence is fixed: null/empty first, then timestamp formatting (which
//! short-circuits zero replacement), then zero replacement, then plain
//! stringification.

use chrono::{Local, TimeZone};
use serde_json::Value;
use table_common::{format_timestamp_in, FormatKind, PLACEHOLDER};

/// Format a raw value for display, using the local time zone for timestamps.
pub fn format_value(value: Option<&Value>, replace_zero: bool, kind: Option<FormatKind>) -> String {
    format_value_in(&Local, value, replace_zero, kind)
}

/// Format a raw value for display, rendering timestamps in `tz`.
pub fn format_value_in<Tz: TimeZone>(
    tz: &Tz,
    value: Option<&Value>,
    replace_zero: bool,
    kind: Option<FormatKind>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let value = match value {
        None | Some(Value::Null) => return PLACEHOLDER.to_string(),
        Some(Value::String(s)) if s.is_empty() => return PLACEHOLDER.to_string(),
        Some(v) => v,
    };

    if let Some(kind) = kind {
        // Unparseable or out-of-range timestamps degrade to the raw value
        return as_timestamp(value)
            .and_then(|ts| format_timestamp_in(tz, ts, kind))
            .unwrap_or_else(|| display_value(value));
    }

    if replace_zero && as_float(value) == Some(0.0) {
        return PLACEHOLDER.to_string();
    }

    display_value(value)
}

/// Whether a value counts as "no data" when deciding if a column is kept.
///
/// Missing, null, `""`, `"-"`, numeric zero, `"0"`, `"0.0"` and `false`.
pub fn is_blank_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => matches!(s.as_str(), "" | "-" | "0" | "0.0"),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Plain display text: strings unquoted, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => PLACEHOLDER.to_string(),
        other => other.to_string(),
    }
}

/// Interpret a value as integer seconds since the epoch.
fn as_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if let Some(u) = n.as_u64() {
                i64::try_from(u).ok()
            } else {
                let f = n.as_f64()?.trunc();
                // i64::MAX is not exactly representable; stay strictly inside
                (f.is_finite() && f > i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Interpret a value as a float for zero detection.
fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
