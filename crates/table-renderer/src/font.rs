//! Font loading, measuring and drawing.
//!
//! Two logical faces are used: regular for data cells and bold for headers
//! and the banner caption. Loading never fails. A missing bold face falls back
//! to the regular TrueType face, and a missing regular face falls back to the
//! built-in bitmap face.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::builtin_font;

pub const DEFAULT_REGULAR_FONT: &str = "./font/PingFangSC-Regular.otf";
pub const DEFAULT_BOLD_FONT: &str = "./font/PingFangSC-Semibold.otf";

/// Where to load the two faces from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl Default for FontPaths {
    fn default() -> Self {
        Self {
            regular: PathBuf::from(DEFAULT_REGULAR_FONT),
            bold: PathBuf::from(DEFAULT_BOLD_FONT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Ink bounding box of a laid-out string, relative to the draw origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
    /// Offset of the ink box's left edge from the origin
    pub left: i32,
    /// Offset of the ink box's top edge from the origin
    pub top: i32,
}

/// A loaded font face.
#[derive(Clone)]
pub enum Face {
    TrueType(Font<'static>),
    /// Bitmap glyphs; `bold` adds a one-pixel overstrike.
    Builtin { bold: bool },
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::TrueType(font) => f
                .debug_struct("TrueType")
                .field("glyphs", &font.glyph_count())
                .finish(),
            Face::Builtin { bold } => f.debug_struct("Builtin").field("bold", bold).finish(),
        }
    }
}

impl Face {
    /// Load a TrueType/OpenType face from disk.
    pub fn load(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        Font::try_from_vec(bytes)
            .map(Face::TrueType)
            .ok_or_else(|| format!("{}: not a usable font file", path.display()))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Face::Builtin { .. })
    }

    /// Measure the ink box of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> TextExtent {
        match self {
            Face::TrueType(font) => {
                let scale = Scale::uniform(size);
                let ascent = font.v_metrics(scale).ascent;
                let mut bounds: Option<(i32, i32, i32, i32)> = None;

                for glyph in font.layout(text, scale, point(0.0, ascent)) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    bounds = Some(match bounds {
                        None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                        Some((x0, y0, x1, y1)) => {
                            (x0.min(bb.min.x), y0.min(bb.min.y), x1.max(bb.max.x), y1.max(bb.max.y))
                        }
                    });
                }

                bounds
                    .map(|(x0, y0, x1, y1)| TextExtent {
                        width: (x1 - x0) as u32,
                        height: (y1 - y0) as u32,
                        left: x0,
                        top: y0,
                    })
                    .unwrap_or_default()
            }
            Face::Builtin { bold } => {
                let (width, height) = builtin_font::measure(text, size);
                let overstrike = u32::from(*bold && width > 0);
                TextExtent {
                    width: width + overstrike,
                    height,
                    left: 0,
                    top: 0,
                }
            }
        }
    }

    /// Draw `text` so that its ink box's top-left corner lands at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: f32, text: &str) {
        match self {
            Face::TrueType(font) => {
                let extent = self.measure(text, size);
                draw_text_mut(
                    canvas,
                    color,
                    x - extent.left,
                    y - extent.top,
                    Scale::uniform(size),
                    font,
                    text,
                );
            }
            Face::Builtin { bold } => {
                let passes = if *bold { 2 } else { 1 };
                let (width, height) = canvas.dimensions();
                builtin_font::for_each_pixel(text, size, |px, py| {
                    for pass in 0..passes {
                        let cx = x as i64 + px as i64 + pass;
                        let cy = y as i64 + py as i64;
                        if cx >= 0 && cy >= 0 && cx < width as i64 && cy < height as i64 {
                            canvas.put_pixel(cx as u32, cy as u32, color);
                        }
                    }
                });
            }
        }
    }
}

/// The regular and bold faces used for one generator.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: Face,
    bold: Face,
}

impl FontSet {
    /// Load both faces, falling back instead of failing.
    pub fn load(paths: &FontPaths) -> Self {
        let regular = match Face::load(&paths.regular) {
            Ok(face) => face,
            Err(error) => {
                tracing::warn!(%error, "Regular font unavailable, using built-in bitmap face");
                Face::Builtin { bold: false }
            }
        };

        let bold = match Face::load(&paths.bold) {
            Ok(face) => face,
            Err(error) => {
                let fallback = match &regular {
                    Face::TrueType(font) => Face::TrueType(font.clone()),
                    Face::Builtin { .. } => Face::Builtin { bold: true },
                };
                tracing::warn!(
                    %error,
                    builtin = fallback.is_builtin(),
                    "Bold font unavailable, falling back"
                );
                fallback
            }
        };

        Self { regular, bold }
    }

    /// Bitmap faces only; no filesystem access.
    pub fn builtin() -> Self {
        Self {
            regular: Face::Builtin { bold: false },
            bold: Face::Builtin { bold: true },
        }
    }

    pub fn face(&self, weight: Weight) -> &Face {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}
