//! Synthetic record generators.
//!
//! These generators create predictable, verifiable record sets so tests can
//! check exact cell contents without hand-writing large fixtures.

use serde_json::{json, Map, Value};
use table_common::Record;

/// Creates `rows` records with `cols` columns named `c0..c{cols-1}`.
///
/// Each value is `row * 100 + col + 1`, so no generated value is zero and
/// no column is pruned.
///
/// # Example
///
/// ```
/// use test_utils::generate_records;
///
/// let rows = generate_records(3, 2);
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[1]["c1"], 102);
/// ```
pub fn generate_records(rows: usize, cols: usize) -> Vec<Record> {
    (0..rows)
        .map(|row| {
            let mut record = Map::new();
            for col in 0..cols {
                record.insert(column_key(col), json!(row * 100 + col + 1));
            }
            record
        })
        .collect()
}

/// Column keys produced by the generators.
pub fn generated_columns(cols: usize) -> Vec<String> {
    (0..cols).map(column_key).collect()
}

/// Like [`generate_records`], but the columns listed in `blank` only ever
/// hold blank values (cycling through null, zero, `""`, `"-"` and `"0.0"`).
pub fn generate_sparse_records(rows: usize, cols: usize, blank: &[usize]) -> Vec<Record> {
    let blanks = [Value::Null, json!(0), json!(""), json!("-"), json!("0.0")];
    let mut records = generate_records(rows, cols);
    for (row, record) in records.iter_mut().enumerate() {
        for &col in blank {
            record.insert(column_key(col), blanks[row % blanks.len()].clone());
        }
    }
    records
}

/// Records with a `status` column cycling through the traffic-light values
/// and a `result` column that contains `FAIL` on every third row.
pub fn generate_status_records(rows: usize) -> Vec<Record> {
    const STATUSES: [&str; 3] = ["绿灯", "黄灯", "红灯"];
    (0..rows)
        .map(|row| {
            let mut record = Map::new();
            record.insert("id".to_string(), json!(row + 1));
            record.insert("status".to_string(), json!(STATUSES[row % STATUSES.len()]));
            let result = if row % 3 == 2 { "FAIL" } else { "PASS" };
            record.insert("result".to_string(), json!(result));
            record
        })
        .collect()
}

fn column_key(col: usize) -> String {
    format!("c{}", col)
}
