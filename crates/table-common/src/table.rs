//! Abstract table model shared by the builder and the renderer.
//!
//! A [`TableData`] is a grid of header rows made of [`HeaderSlot`]s followed
//! by rows of pre-formatted strings. Merged header cells are expressed as an
//! anchor [`Cell`] with `colspan`/`rowspan` > 1 plus continuation slots for the
//! positions it covers.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Display text for null, empty and (optionally) zero values.
pub const PLACEHOLDER: &str = "-";

/// A raw input row: column key -> JSON value, in insertion order.
pub type Record = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// Column configuration
// ============================================================================

/// Timestamp formatting applied to a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    /// `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "to_datetime", alias = "to_format")]
    ToDatetime,
    /// `MM月DD日`
    #[serde(rename = "to_monthday", alias = "to_day")]
    ToMonthday,
}

impl FormatKind {
    /// Recognize a format token, including the legacy spellings.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "to_datetime" | "to_format" => Some(Self::ToDatetime),
            "to_monthday" | "to_day" => Some(Self::ToMonthday),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::ToDatetime => "to_datetime",
            Self::ToMonthday => "to_monthday",
        }
    }
}

/// What a `column_display` entry means for one column.
///
/// A plain string is a display label, unless it is one of the format tokens,
/// in which case the column keeps its raw key as label and its values are
/// formatted as timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnDisplay {
    Label(String),
    Format(FormatKind),
}

impl ColumnDisplay {
    pub fn format_kind(&self) -> Option<FormatKind> {
        match self {
            Self::Format(kind) => Some(*kind),
            Self::Label(_) => None,
        }
    }

    /// Header label for `key` under this display rule.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        match self {
            Self::Label(label) => label,
            Self::Format(_) => key,
        }
    }
}

impl From<String> for ColumnDisplay {
    fn from(value: String) -> Self {
        match FormatKind::from_token(&value) {
            Some(kind) => Self::Format(kind),
            None => Self::Label(value),
        }
    }
}

impl From<&str> for ColumnDisplay {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ColumnDisplay> for String {
    fn from(value: ColumnDisplay) -> Self {
        match value {
            ColumnDisplay::Label(label) => label,
            ColumnDisplay::Format(kind) => kind.token().to_string(),
        }
    }
}

/// One grouped header label and the number of underlying columns it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub label: String,
    pub span: usize,
}

impl HeaderGroup {
    pub fn new(label: impl Into<String>, span: usize) -> Self {
        Self {
            label: label.into(),
            span,
        }
    }
}

/// One level of a multi-level header, left to right.
///
/// Serialized as a JSON/YAML object `{"label": span, ...}`; key order is the
/// column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderLayer {
    pub groups: Vec<HeaderGroup>,
}

impl HeaderLayer {
    pub fn new(groups: Vec<HeaderGroup>) -> Self {
        Self { groups }
    }

    /// Total number of underlying columns declared by this layer.
    pub fn declared_width(&self) -> usize {
        self.groups.iter().map(|g| g.span).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for HeaderLayer {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        Self {
            groups: iter
                .into_iter()
                .map(|(label, span)| HeaderGroup::new(label, span))
                .collect(),
        }
    }
}

impl Serialize for HeaderLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.label, &group.span)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HeaderLayer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LayerVisitor;

        impl<'de> Visitor<'de> for LayerVisitor {
            type Value = HeaderLayer;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of header label to column span")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut groups = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, span)) = access.next_entry::<String, usize>()? {
                    groups.push(HeaderGroup { label, span });
                }
                Ok(HeaderLayer { groups })
            }
        }

        deserializer.deserialize_map(LayerVisitor)
    }
}

// ============================================================================
// Grid model
// ============================================================================

/// A logical grid cell. Only its anchor position is painted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    #[serde(default = "one")]
    pub rowspan: usize,
    #[serde(default = "one")]
    pub colspan: usize,
}

fn one() -> usize {
    1
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rowspan: 1,
            colspan: 1,
        }
    }

    pub fn spanning(text: impl Into<String>, rowspan: usize, colspan: usize) -> Self {
        Self {
            text: text.into(),
            rowspan: rowspan.max(1),
            colspan: colspan.max(1),
        }
    }
}

/// One grid position of a header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeaderSlot {
    /// Top-left position of a (possibly merged) cell
    Anchor(Cell),
    /// Position covered by an anchor to its left or above
    Continuation,
    /// Position with no header cell at all
    Empty,
}

impl HeaderSlot {
    pub fn anchor(text: impl Into<String>) -> Self {
        Self::Anchor(Cell::new(text))
    }

    pub fn as_anchor(&self) -> Option<&Cell> {
        match self {
            Self::Anchor(cell) => Some(cell),
            _ => None,
        }
    }

    /// Grid columns this slot contributes to its own row.
    fn row_width(&self) -> usize {
        match self {
            Self::Anchor(cell) => cell.colspan,
            Self::Continuation => 0,
            Self::Empty => 1,
        }
    }
}

/// Headers plus formatted data rows, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<Vec<HeaderSlot>>,
    pub data: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<Vec<HeaderSlot>>, data: Vec<Vec<String>>) -> Self {
        Self { headers, data }
    }

    /// Number of header levels.
    pub fn header_depth(&self) -> usize {
        self.headers.len()
    }

    /// Widest header row, counting anchors by colspan.
    pub fn header_cols(&self) -> usize {
        self.headers
            .iter()
            .map(|row| row.iter().map(HeaderSlot::row_width).sum::<usize>())
            .max()
            .unwrap_or(0)
    }

    /// Grid width: the wider of the header grid and the longest data row.
    pub fn total_cols(&self) -> usize {
        let data_cols = self.data.iter().map(Vec::len).max().unwrap_or(0);
        self.header_cols().max(data_cols)
    }

    /// Total grid rows (header levels + data rows).
    pub fn total_rows(&self) -> usize {
        self.headers.len() + self.data.len()
    }

    /// Column name for every grid column, read from the last header row.
    ///
    /// A position resolves to a name only when a single-column anchor sits
    /// there; positions under a span or without a header resolve to `None`.
    pub fn column_names(&self) -> Vec<Option<&str>> {
        let mut names = vec![None; self.total_cols()];
        if let Some(last) = self.headers.last() {
            for (idx, slot) in last.iter().enumerate() {
                if let (Some(cell), Some(name)) = (slot.as_anchor(), names.get_mut(idx)) {
                    if cell.colspan == 1 {
                        *name = Some(cell.text.as_str());
                    }
                }
            }
        }
        names
    }

    /// Whether the last header row names every grid column exactly once.
    pub fn columns_aligned(&self) -> bool {
        let names = self.column_names();
        !names.is_empty() && names.iter().all(Option::is_some)
    }

    /// Grid index of the first column whose header text is `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names()
            .iter()
            .position(|candidate| *candidate == Some(name))
    }

    /// Resolve which anchor covers a header grid position.
    ///
    /// Returns the anchor's `(row, col)`, or `None` for empty or
    /// uncovered positions.
    pub fn covering_anchor(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        for (r, header_row) in self.headers.iter().enumerate().take(row + 1) {
            for (c, slot) in header_row.iter().enumerate().take(col + 1) {
                if let HeaderSlot::Anchor(cell) = slot {
                    if row < r + cell.rowspan && col < c + cell.colspan {
                        return Some((r, c));
                    }
                }
            }
        }
        None
    }

    /// Check the header grid invariants.
    ///
    /// Every position of every header row, across `total_cols`, must be
    /// covered by exactly one anchor footprint or be an explicit empty slot,
    /// and every continuation must sit inside some anchor's footprint.
    pub fn validate(&self) -> Result<(), String> {
        let cols = self.total_cols();
        let depth = self.headers.len();
        let mut owner: Vec<Vec<Option<(usize, usize)>>> = vec![vec![None; cols]; depth];

        for (r, row) in self.headers.iter().enumerate() {
            for (c, slot) in row.iter().enumerate() {
                let HeaderSlot::Anchor(cell) = slot else {
                    continue;
                };
                if cell.rowspan == 0 || cell.colspan == 0 {
                    return Err(format!("header cell '{}' at ({}, {}) has a zero span", cell.text, r, c));
                }
                if r + cell.rowspan > depth || c + cell.colspan > cols {
                    return Err(format!(
                        "header cell '{}' at ({}, {}) spans outside the {}x{} header grid",
                        cell.text, r, c, depth, cols
                    ));
                }
                for rr in r..r + cell.rowspan {
                    for cc in c..c + cell.colspan {
                        if let Some(prev) = owner[rr][cc] {
                            return Err(format!(
                                "header position ({}, {}) covered by both {:?} and ({}, {})",
                                rr, cc, prev, r, c
                            ));
                        }
                        owner[rr][cc] = Some((r, c));
                    }
                }
            }
        }

        for (r, row) in self.headers.iter().enumerate() {
            if row.len() > cols {
                return Err(format!("header row {} has {} slots for {} columns", r, row.len(), cols));
            }
            for c in 0..cols {
                match row.get(c) {
                    Some(HeaderSlot::Anchor(_)) => {}
                    Some(HeaderSlot::Continuation) if owner[r][c].is_some() => {}
                    Some(HeaderSlot::Continuation) => {
                        return Err(format!("continuation at ({}, {}) has no anchor", r, c));
                    }
                    Some(HeaderSlot::Empty) if owner[r][c].is_none() => {}
                    Some(HeaderSlot::Empty) => {
                        return Err(format!("empty slot at ({}, {}) lies under a span", r, c));
                    }
                    None if owner[r][c].is_some() => {}
                    None => {
                        return Err(format!("header row {} does not cover column {}", r, c));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped_table() -> TableData {
        TableData::new(
            vec![
                vec![
                    HeaderSlot::Anchor(Cell::spanning("Group", 1, 2)),
                    HeaderSlot::Continuation,
                    HeaderSlot::anchor("Solo"),
                ],
                vec![HeaderSlot::anchor("a"), HeaderSlot::anchor("b"), HeaderSlot::anchor("c")],
            ],
            vec![vec!["1".into(), "2".into(), "3".into()]],
        )
    }

    #[test]
    fn test_dimensions() {
        let table = grouped_table();
        assert_eq!(table.header_depth(), 2);
        assert_eq!(table.total_cols(), 3);
        assert_eq!(table.total_rows(), 3);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_total_cols_uses_longest_data_row() {
        let table = TableData::new(
            vec![vec![HeaderSlot::anchor("a")]],
            vec![vec!["1".into(), "2".into(), "3".into(), "4".into()]],
        );
        assert_eq!(table.total_cols(), 4);
        // the header row no longer covers the grid
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_column_lookup() {
        let table = grouped_table();
        assert_eq!(table.column_names(), vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(table.column_index("c"), Some(2));
        assert_eq!(table.column_index("Group"), None);
        assert!(table.columns_aligned());
    }

    #[test]
    fn test_column_lookup_spanned_last_row() {
        let mut table = grouped_table();
        table.headers.pop();
        assert_eq!(table.column_names(), vec![None, None, Some("Solo")]);
        assert!(!table.columns_aligned());
    }

    #[test]
    fn test_covering_anchor() {
        let table = grouped_table();
        assert_eq!(table.covering_anchor(0, 0), Some((0, 0)));
        assert_eq!(table.covering_anchor(0, 1), Some((0, 0)));
        assert_eq!(table.covering_anchor(0, 2), Some((0, 2)));
        assert_eq!(table.covering_anchor(1, 1), Some((1, 1)));
    }

    #[test]
    fn test_covering_anchor_rowspan() {
        let table = TableData::new(
            vec![
                vec![HeaderSlot::Anchor(Cell::spanning("Tall", 2, 1)), HeaderSlot::anchor("x")],
                vec![HeaderSlot::Continuation, HeaderSlot::anchor("y")],
            ],
            vec![],
        );
        assert!(table.validate().is_ok());
        assert_eq!(table.covering_anchor(1, 0), Some((0, 0)));
        assert_eq!(table.covering_anchor(1, 1), Some((1, 1)));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let table = TableData::new(
            vec![vec![
                HeaderSlot::Anchor(Cell::spanning("Wide", 1, 2)),
                HeaderSlot::anchor("clash"),
            ]],
            vec![],
        );
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_orphan_continuation() {
        let table = TableData::new(
            vec![vec![HeaderSlot::Continuation, HeaderSlot::anchor("b")]],
            vec![vec!["1".into(), "2".into()]],
        );
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_column_display_tokens() {
        assert_eq!(ColumnDisplay::from("to_datetime").format_kind(), Some(FormatKind::ToDatetime));
        assert_eq!(ColumnDisplay::from("to_format").format_kind(), Some(FormatKind::ToDatetime));
        assert_eq!(ColumnDisplay::from("to_day").format_kind(), Some(FormatKind::ToMonthday));
        assert_eq!(ColumnDisplay::from("Score").format_kind(), None);
        assert_eq!(ColumnDisplay::from("to_day").label_for("created"), "created");
        assert_eq!(ColumnDisplay::from("Score").label_for("score"), "Score");
    }

    #[test]
    fn test_header_layer_preserves_order() {
        let layer: HeaderLayer = serde_json::from_str(r#"{"Zeta": 2, "Alpha": 1, "Mid": 3}"#).unwrap();
        let labels: Vec<&str> = layer.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(layer.declared_width(), 6);
        assert_eq!(serde_json::to_string(&layer).unwrap(), r#"{"Zeta":2,"Alpha":1,"Mid":3}"#);
    }
}
