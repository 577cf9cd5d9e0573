//! Raster rendering of report tables.
//!
//! Turns a [`TableData`](table_common::TableData) grid into an RGB image:
//! - Grid geometry and DPI scaling
//! - Cell painting (fills, borders, centered text)
//! - Header merging and row highlighting
//! - Optional banner strip stacked above the table
//! - Indexed/RGBA PNG encoding of the final artifact

mod builtin_font;

pub mod banner;
pub mod cell;
pub mod compositor;
pub mod context;
pub mod font;
pub mod generator;
pub mod geometry;
pub mod png;

pub use context::RenderContext;
pub use font::{Face, FontPaths, FontSet, TextExtent, Weight};
pub use compositor::TableOptions;
pub use generator::{artifact_name, GeneratorConfig, RenderRequest, TableImageGenerator};
pub use geometry::TableGeometry;
