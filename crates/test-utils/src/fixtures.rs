//! Common record and header fixtures for table tests.
//!
//! Each fixture mirrors a report shape the renderer is used for: a plain
//! score sheet, a status board with traffic-light values, and a grouped
//! (two-level) header layout.

use serde_json::{json, Value};
use table_common::{HeaderLayer, Record};

/// Convert a JSON object into a [`Record`]. Panics on non-objects.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture record must be a JSON object, got {other}"),
    }
}

/// Convert a JSON array of objects into records.
pub fn records(value: Value) -> Vec<Record> {
    match value {
        Value::Array(items) => items.into_iter().map(record).collect(),
        other => panic!("fixture records must be a JSON array, got {other}"),
    }
}

/// Owned strings from string literals.
pub fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Two players, one with a zero score.
pub fn score_records() -> Vec<Record> {
    records(json!([
        {"name": "A", "score": 0},
        {"name": "B", "score": 5}
    ]))
}

/// Column keys used by [`status_records`], in display order.
pub const STATUS_COLUMNS: &[&str] = &["name", "status", "result", "score", "unused", "created"];

/// A status board: traffic-light status, PASS/FAIL result, timestamps and a
/// column (`unused`) that never carries data.
pub fn status_records() -> Vec<Record> {
    records(json!([
        {"name": "alpha", "status": "绿灯", "result": "PASS", "score": 12, "unused": 0, "created": 1_709_656_200},
        {"name": "beta", "status": "红灯", "result": "FAIL: timeout", "score": 0, "unused": "", "created": 1_709_742_600},
        {"name": "gamma", "status": "黄灯", "result": "PASS", "score": 7.5, "unused": null, "created": "bad"},
        {"name": "delta", "status": "", "result": "FAIL", "score": "0", "unused": "-", "created": 0}
    ]))
}

/// A single grouped header layer over [`STATUS_COLUMNS`]:
/// `Who` spans name, `Outcome` spans status+result, `Detail` spans the rest.
pub fn status_header_layers() -> Vec<HeaderLayer> {
    vec![[("Who", 1), ("Outcome", 2), ("Detail", 3)].into_iter().collect()]
}
