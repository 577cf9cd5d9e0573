//! Grid geometry: column count, cell width and canvas size at 72 DPI, plus
//! the DPI scaling applied on top.

use table_common::{TableData, TableError, TableResult};

/// Width of the screen the table is laid out for.
pub const CANVAS_WIDTH: u32 = 1920;
/// Margin kept free on each side of the table.
pub const SIDE_MARGIN: u32 = 40;
pub const MIN_CELL_WIDTH: u32 = 120;
pub const MAX_CELL_WIDTH: u32 = 240;

/// Resolution that base sizes are expressed in.
pub const BASE_DPI: f64 = 72.0;
pub const DEFAULT_DPI: f64 = 150.0;

/// Unscaled table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableGeometry {
    pub total_cols: usize,
    pub header_rows: usize,
    pub data_rows: usize,
    pub cell_width: u32,
    pub cell_height: u32,
    pub total_width: u32,
    pub total_height: u32,
}

impl TableGeometry {
    /// Lay out `table` with rows of `cell_height` pixels.
    pub fn compute(table: &TableData, cell_height: u32) -> TableResult<Self> {
        let total_cols = table.total_cols();
        if total_cols == 0 {
            return Err(TableError::InvalidConfiguration(
                "table has no columns to render".to_string(),
            ));
        }

        let cell_width = cell_width_for(total_cols);
        let header_rows = table.header_depth();
        let data_rows = table.data.len();
        let total_width = total_cols as u32 * cell_width + 1;
        let total_height = (header_rows + data_rows) as u32 * cell_height + 1;

        Ok(Self {
            total_cols,
            header_rows,
            data_rows,
            cell_width,
            cell_height,
            total_width,
            total_height,
        })
    }

    pub fn total_rows(&self) -> usize {
        self.header_rows + self.data_rows
    }
}

/// One global column width: the usable width split evenly, clamped to
/// `[MIN_CELL_WIDTH, MAX_CELL_WIDTH]`.
pub fn cell_width_for(total_cols: usize) -> u32 {
    if total_cols == 0 {
        return MAX_CELL_WIDTH;
    }
    let usable = CANVAS_WIDTH - 2 * SIDE_MARGIN;
    let suggested = usable / total_cols.min(u32::MAX as usize) as u32;
    suggested.clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH)
}

/// Multiplier from base (72 DPI) sizes to output pixels.
pub fn dpi_scale(dpi: f64) -> TableResult<f64> {
    if !dpi.is_finite() || dpi <= 0.0 {
        return Err(TableError::InvalidConfiguration(format!(
            "dpi must be a positive number, got {}",
            dpi
        )));
    }
    Ok(dpi / BASE_DPI)
}

/// Scale a base dimension, flooring to whole pixels.
pub fn scale_dim(value: u32, scale: f64) -> u32 {
    (value as f64 * scale).floor() as u32
}
