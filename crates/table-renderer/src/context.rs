//! Per-render sizing state.
//!
//! Everything that depends on the output DPI is computed once here, so the
//! generator itself never changes while a table is being painted.

use table_common::{TableError, TableResult, TableStyle};

use crate::font::FontSet;
use crate::geometry::{dpi_scale, scale_dim, TableGeometry};

/// Scaled sizes plus the style and faces for one render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub geometry: TableGeometry,
    pub scale: f64,
    pub cell_width: u32,
    pub cell_height: u32,
    pub font_size: f32,
    pub padding: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub style: &'a TableStyle,
    pub fonts: &'a FontSet,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        geometry: TableGeometry,
        dpi: f64,
        style: &'a TableStyle,
        fonts: &'a FontSet,
    ) -> TableResult<Self> {
        let scale = dpi_scale(dpi)?;
        let ctx = Self {
            geometry,
            scale,
            cell_width: scale_dim(geometry.cell_width, scale),
            cell_height: scale_dim(geometry.cell_height, scale),
            font_size: scale_dim(style.font_size, scale) as f32,
            padding: scale_dim(style.padding, scale),
            canvas_width: scale_dim(geometry.total_width, scale),
            canvas_height: scale_dim(geometry.total_height, scale),
            style,
            fonts,
        };

        if ctx.cell_width == 0 || ctx.cell_height == 0 || ctx.canvas_width == 0 || ctx.canvas_height == 0 {
            return Err(TableError::InvalidConfiguration(format!(
                "dpi {} scales the table to a zero-sized canvas",
                dpi
            )));
        }

        Ok(ctx)
    }

    /// Pixel origin of grid position `(row, col)`, header rows included.
    pub fn cell_origin(&self, row: usize, col: usize) -> (u32, u32) {
        (col as u32 * self.cell_width, row as u32 * self.cell_height)
    }
}
