//! Table Data Builder.
//!
//! Consumes raw records plus column configuration and produces a
//! [`TableData`]: header rows (possibly multi-level, with merged cells) and
//! formatted data rows. Columns listed in `column_order` that never carry a
//! value are pruned before anything else happens.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use table_common::{
    Cell, ColumnDisplay, FormatKind, HeaderLayer, HeaderSlot, Record, TableData, TableError,
    TableResult,
};

use crate::format::{format_value, is_blank_value};

/// Column configuration for one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Allowed column keys, in display order. `None` keeps every column.
    pub column_order: Option<Vec<String>>,
    /// Grouped header levels drawn above the column-name row.
    pub multi_header: Option<Vec<HeaderLayer>>,
    /// Column key -> display label or timestamp format token.
    pub column_display: Option<HashMap<String, ColumnDisplay>>,
    /// Render numeric zero as the placeholder.
    pub replace_zero: bool,
}

impl BuildOptions {
    fn display_for(&self, column: &str) -> Option<&ColumnDisplay> {
        self.column_display.as_ref()?.get(column)
    }

    fn format_kind(&self, column: &str) -> Option<FormatKind> {
        self.display_for(column).and_then(ColumnDisplay::format_kind)
    }

    /// Header label for a column key.
    pub fn column_label<'a>(&'a self, column: &'a str) -> &'a str {
        match self.display_for(column) {
            Some(display) => display.label_for(column),
            None => column,
        }
    }
}

/// Build the table grid from raw records.
pub fn build_table(records: &[Record], options: &BuildOptions) -> TableResult<TableData> {
    let columns = resolve_columns(records, options);
    let headers = build_headers(&columns, options);
    let data = build_rows(records, &columns, options);

    tracing::debug!(
        records = records.len(),
        columns = columns.len(),
        header_depth = headers.len(),
        "Built table data"
    );

    let table = TableData::new(headers, data);
    table.validate().map_err(TableError::InvalidConfiguration)?;
    Ok(table)
}

/// Restrict `column_order` to columns where at least one record has data.
///
/// Order of the retained columns is preserved.
pub fn valid_columns(records: &[Record], column_order: &[String]) -> Vec<String> {
    let filled: HashSet<&str> = column_order
        .iter()
        .filter(|col| records.iter().any(|row| !is_blank_value(row.get(col.as_str()))))
        .map(String::as_str)
        .collect();

    column_order
        .iter()
        .filter(|col| filled.contains(col.as_str()))
        .cloned()
        .collect()
}

/// Columns to render: the pruned `column_order`, or every key seen in the
/// records (first-seen order) when no order is configured.
fn resolve_columns(records: &[Record], options: &BuildOptions) -> Vec<String> {
    match &options.column_order {
        Some(order) => {
            let columns = valid_columns(records, order);
            let pruned = order.len() - columns.len();
            if pruned > 0 {
                tracing::debug!(pruned, "Dropped columns without data");
            }
            columns
        }
        None => {
            let mut seen = HashSet::new();
            records
                .iter()
                .flat_map(|row| row.keys())
                .filter(|key| seen.insert(key.as_str()))
                .cloned()
                .collect()
        }
    }
}

/// Build every header row for the resolved column list.
fn build_headers(columns: &[String], options: &BuildOptions) -> Vec<Vec<HeaderSlot>> {
    let column_row = || -> Vec<HeaderSlot> {
        columns
            .iter()
            .map(|col| HeaderSlot::anchor(options.column_label(col)))
            .collect()
    };

    let Some(layers) = &options.multi_header else {
        return vec![column_row()];
    };

    let mut headers: Vec<Vec<HeaderSlot>> = layers
        .iter()
        .map(|layer| build_layer_row(layer, columns.len()))
        .filter(|row| !row.is_empty())
        .collect();

    // The column-name row is only added when display names are configured
    let has_display = options
        .column_display
        .as_ref()
        .is_some_and(|display| !display.is_empty());
    if (has_display && !columns.is_empty()) || headers.is_empty() {
        headers.push(column_row());
    }

    headers
}

/// Lay out one grouped header level over `column_count` surviving columns.
///
/// Spans are declared against the unfiltered column layout; each group keeps
/// only the positions that still exist after pruning, and the cursor always
/// advances by the declared span so later groups stay where they were declared.
fn build_layer_row(layer: &HeaderLayer, column_count: usize) -> Vec<HeaderSlot> {
    let mut row = Vec::with_capacity(column_count);
    let mut cursor = 0usize;

    for group in &layer.groups {
        let end = cursor.saturating_add(group.span).min(column_count);
        let valid_span = end.saturating_sub(cursor);

        if valid_span > 0 {
            row.push(HeaderSlot::Anchor(Cell::spanning(&group.label, 1, valid_span)));
            row.extend(std::iter::repeat(HeaderSlot::Continuation).take(valid_span - 1));
        }

        cursor = cursor.saturating_add(group.span);
    }

    if !row.is_empty() && row.len() < column_count {
        row.resize(column_count, HeaderSlot::Empty);
    }

    row
}

/// Format every record against the resolved column list.
fn build_rows(records: &[Record], columns: &[String], options: &BuildOptions) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|col| format_value(record.get(col), options.replace_zero, options.format_kind(col)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layer_row_truncates_to_surviving_columns() {
        let layer: HeaderLayer = [("First", 2), ("Second", 3)].into_iter().collect();
        let row = build_layer_row(&layer, 3);
        assert_eq!(
            row,
            vec![
                HeaderSlot::Anchor(Cell::spanning("First", 1, 2)),
                HeaderSlot::Continuation,
                HeaderSlot::Anchor(Cell::spanning("Second", 1, 1)),
            ]
        );
    }

    #[test]
    fn test_layer_row_skips_groups_past_the_end() {
        let layer: HeaderLayer = [("A", 2), ("B", 2), ("C", 1)].into_iter().collect();
        let row = build_layer_row(&layer, 2);
        assert_eq!(
            row,
            vec![HeaderSlot::Anchor(Cell::spanning("A", 1, 2)), HeaderSlot::Continuation]
        );
    }

    #[test]
    fn test_layer_row_pads_short_layers() {
        let layer: HeaderLayer = [("A", 1)].into_iter().collect();
        let row = build_layer_row(&layer, 3);
        assert_eq!(row, vec![HeaderSlot::anchor("A"), HeaderSlot::Empty, HeaderSlot::Empty]);
    }

    #[test]
    fn test_layer_row_zero_span_group_emits_nothing() {
        let layer: HeaderLayer = [("Ghost", 0), ("Real", 2)].into_iter().collect();
        let row = build_layer_row(&layer, 2);
        assert_eq!(
            row,
            vec![HeaderSlot::Anchor(Cell::spanning("Real", 1, 2)), HeaderSlot::Continuation]
        );
    }

    #[test]
    fn test_columns_without_order_use_first_seen_keys() {
        let records = vec![record(json!({"b": 1, "a": 2})), record(json!({"a": 3, "c": 4}))];
        let columns = resolve_columns(&records, &BuildOptions::default());
        assert_eq!(columns, strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_column_label_rules() {
        let options = BuildOptions {
            column_display: Some(HashMap::from([
                ("score".to_string(), ColumnDisplay::from("Score")),
                ("created".to_string(), ColumnDisplay::from("to_datetime")),
            ])),
            ..Default::default()
        };
        assert_eq!(options.column_label("score"), "Score");
        assert_eq!(options.column_label("created"), "created");
        assert_eq!(options.column_label("name"), "name");
    }

    #[test]
    fn test_multi_header_without_display_has_no_column_row() {
        let options = BuildOptions {
            column_order: Some(strings(&["a", "b"])),
            multi_header: Some(vec![[("Group", 2)].into_iter().collect()]),
            column_display: Some(HashMap::new()),
            ..Default::default()
        };
        let records = vec![record(json!({"a": 1, "b": 2}))];
        let table = build_table(&records, &options).unwrap();
        assert_eq!(table.header_depth(), 1);
        assert!(!table.columns_aligned());
    }
}
