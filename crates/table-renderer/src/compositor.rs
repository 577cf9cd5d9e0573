//! Table compositor: paints the header block and the data rows onto one
//! canvas.
//!
//! Header anchors are painted once over their whole footprint; a coverage
//! matrix keeps continuation positions and rowspan shadows from being painted
//! again. Column names used for the color column and highlight rules come from
//! the last header row.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use table_common::{HeaderSlot, TableData};

use crate::cell::{draw_cell, CellRole};
use crate::context::RenderContext;

/// Per-render options that affect painting but not the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Column whose values are colored by status.
    pub color_column: Option<String>,
    /// Column label -> keyword; a row containing the keyword in that column
    /// is painted with the summary color.
    pub highlight_rules: HashMap<String, String>,
}

/// Highlight rules resolved against grid columns once per table.
///
/// A rule applies to every column whose header carries its label.
struct Highlighter<'t> {
    rules: Vec<(usize, &'t str)>,
}

impl<'t> Highlighter<'t> {
    fn new(names: &[Option<&str>], rules: &'t HashMap<String, String>) -> Self {
        let mut resolved = Vec::new();
        for (column, keyword) in rules {
            let before = resolved.len();
            resolved.extend(
                names
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| **name == Some(column.as_str()))
                    .map(|(index, _)| (index, keyword.as_str())),
            );
            if resolved.len() == before {
                tracing::debug!(column = %column, "Highlight rule names an unknown column");
            }
        }
        Self { rules: resolved }
    }

    fn matches(&self, row: &[String]) -> bool {
        self.rules
            .iter()
            .any(|(index, keyword)| row.get(*index).is_some_and(|text| text.contains(keyword)))
    }
}

/// Paint `table` onto a fresh white canvas sized by `ctx`.
pub fn compose_table(table: &TableData, options: &TableOptions, ctx: &RenderContext<'_>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(ctx.canvas_width, ctx.canvas_height, Rgb([255, 255, 255]));

    paint_headers(&mut canvas, table, ctx);
    paint_rows(&mut canvas, table, options, ctx);

    canvas
}

fn paint_headers(canvas: &mut RgbImage, table: &TableData, ctx: &RenderContext<'_>) {
    let depth = table.header_depth();
    let cols = ctx.geometry.total_cols;
    let mut covered = vec![vec![false; cols]; depth];

    for (r, row) in table.headers.iter().enumerate() {
        for (c, slot) in row.iter().enumerate().take(cols) {
            if covered[r][c] {
                continue;
            }
            let (text, rowspan, colspan) = match slot {
                HeaderSlot::Continuation => continue,
                HeaderSlot::Empty => ("", 1, 1),
                HeaderSlot::Anchor(cell) => (cell.text.as_str(), cell.rowspan, cell.colspan),
            };

            for covered_row in covered.iter_mut().skip(r).take(rowspan) {
                for flag in covered_row.iter_mut().skip(c).take(colspan) {
                    *flag = true;
                }
            }

            draw_cell(
                canvas,
                ctx,
                ctx.cell_origin(r, c),
                (rowspan, colspan),
                text,
                CellRole::Header,
            );
        }
    }
}

fn paint_rows(canvas: &mut RgbImage, table: &TableData, options: &TableOptions, ctx: &RenderContext<'_>) {
    let needs_names = options.color_column.is_some() || !options.highlight_rules.is_empty();
    if needs_names && !table.columns_aligned() {
        tracing::warn!(
            header_depth = table.header_depth(),
            "Last header row does not name every column; spanned columns cannot be matched"
        );
    }

    let names = table.column_names();
    let color_column = options.color_column.as_deref();
    let highlighter = Highlighter::new(&names, &options.highlight_rules);
    let first_row = table.header_depth();

    for (row_index, row) in table.data.iter().enumerate() {
        let highlighted = highlighter.matches(row);

        for (col, text) in row.iter().enumerate() {
            let role = CellRole::Data {
                row_index,
                highlighted,
                color_column: color_column.is_some() && names.get(col).copied().flatten() == color_column,
            };
            draw_cell(
                canvas,
                ctx,
                ctx.cell_origin(first_row + row_index, col),
                (1, 1),
                text,
                role,
            );
        }
    }
}
