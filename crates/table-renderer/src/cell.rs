//! Painting a single (possibly merged) cell.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use table_common::{Color, TableStyle, PLACEHOLDER};

use crate::context::RenderContext;
use crate::font::Weight;

/// Border strokes drawn one pixel further inward each.
const BORDER_PASSES: u32 = 2;
/// Text is nudged up by this fraction of the cell height.
const TEXT_LIFT: f32 = 0.05;

/// Where a cell sits in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Header,
    Data {
        row_index: usize,
        highlighted: bool,
        /// The cell belongs to the status color column.
        color_column: bool,
    },
}

/// Resolved colors and face for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPaint {
    pub background: Color,
    pub text_color: Color,
    pub weight: Weight,
}

impl CellPaint {
    pub fn resolve(style: &TableStyle, role: CellRole, text: &str) -> Self {
        match role {
            CellRole::Header => Self {
                background: style.header_color,
                text_color: style.header_text_color,
                weight: Weight::Bold,
            },
            CellRole::Data {
                row_index,
                highlighted,
                color_column,
            } => {
                let background = if highlighted {
                    style.summary_color
                } else {
                    style.row_color(row_index)
                };

                let text_color = if text == PLACEHOLDER {
                    style.empty_text_color
                } else if color_column {
                    style.status_color(text).unwrap_or(style.text_color)
                } else {
                    style.text_color
                };

                Self {
                    background,
                    text_color,
                    weight: Weight::Regular,
                }
            }
        }
    }
}

fn rgb(color: Color) -> Rgb<u8> {
    Rgb(color.to_array())
}

/// Paint one cell whose top-left corner is at pixel `(x, y)`.
///
/// The fill and border cover `[x, x + w] x [y, y + h]` inclusive, so
/// neighbouring cells share their edge line.
pub fn draw_cell(
    canvas: &mut RgbImage,
    ctx: &RenderContext<'_>,
    origin: (u32, u32),
    span: (usize, usize),
    text: &str,
    role: CellRole,
) {
    let (x, y) = origin;
    let (rowspan, colspan) = span;
    let width = ctx.cell_width * colspan as u32;
    let height = ctx.cell_height * rowspan as u32;
    let paint = CellPaint::resolve(ctx.style, role, text);

    draw_filled_rect_mut(
        canvas,
        Rect::at(x as i32, y as i32).of_size(width + 1, height + 1),
        rgb(paint.background),
    );

    for inset in 0..BORDER_PASSES {
        let w = (width + 1).saturating_sub(2 * inset);
        let h = (height + 1).saturating_sub(2 * inset);
        if w == 0 || h == 0 {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            Rect::at((x + inset) as i32, (y + inset) as i32).of_size(w, h),
            rgb(ctx.style.border_color),
        );
    }

    if text.is_empty() {
        return;
    }

    let face = ctx.fonts.face(paint.weight);
    let extent = face.measure(text, ctx.font_size);
    if extent.width + 2 * ctx.padding > width {
        tracing::debug!(
            text,
            text_width = extent.width,
            cell_width = width,
            "Cell text overflows its padding"
        );
    }

    let text_x = x as f32 + (width as f32 - extent.width as f32) / 2.0;
    let text_y = y as f32 + (height as f32 - extent.height as f32) / 2.0 - height as f32 * TEXT_LIFT;
    face.draw(
        canvas,
        rgb(paint.text_color),
        text_x.floor() as i32,
        text_y.floor() as i32,
        ctx.font_size,
        text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(row_index: usize, highlighted: bool, color_column: bool) -> CellRole {
        CellRole::Data {
            row_index,
            highlighted,
            color_column,
        }
    }

    #[test]
    fn test_header_paint() {
        let style = TableStyle::default();
        let paint = CellPaint::resolve(&style, CellRole::Header, "-");
        assert_eq!(paint.background, style.header_color);
        assert_eq!(paint.text_color, style.header_text_color);
        assert_eq!(paint.weight, Weight::Bold);
    }

    #[test]
    fn test_alternating_rows_and_highlight() {
        let style = TableStyle::default();
        assert_eq!(CellPaint::resolve(&style, data(0, false, false), "x").background, style.row_colors[0]);
        assert_eq!(CellPaint::resolve(&style, data(1, false, false), "x").background, style.row_colors[1]);
        assert_eq!(CellPaint::resolve(&style, data(1, true, false), "x").background, style.summary_color);
    }

    #[test]
    fn test_text_color_precedence() {
        let style = TableStyle::default();
        let green = style.status_color("绿灯").unwrap();

        assert_eq!(CellPaint::resolve(&style, data(0, false, true), "绿灯").text_color, green);
        // status values only color the color column
        assert_eq!(CellPaint::resolve(&style, data(0, false, false), "绿灯").text_color, style.text_color);
        assert_eq!(CellPaint::resolve(&style, data(0, false, true), "unknown").text_color, style.text_color);
        assert_eq!(CellPaint::resolve(&style, data(0, false, true), "-").text_color, style.empty_text_color);
    }
}
