//! Generator entry point: records in, PNG file out.
//!
//! A [`TableImageGenerator`] holds the style and loaded faces and is never
//! mutated after construction, so one instance can serve concurrent renders.

use image::RgbImage;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use table_builder::{build_table, BuildOptions};
use table_common::{ColumnDisplay, HeaderLayer, Record, TableData, TableError, TableResult, TableStyle};

use crate::banner::{compose_banner, load_banner, stack};
use crate::compositor::{compose_table, TableOptions};
use crate::context::RenderContext;
use crate::font::{FontPaths, FontSet};
use crate::geometry::{dpi_scale, TableGeometry, DEFAULT_DPI};
use crate::png::encode_rgb;

/// Attempts at finding an unused output file name.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Construction-time settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub fonts: FontPaths,
    pub style: TableStyle,
    pub dpi: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fonts: FontPaths::default(),
            style: TableStyle::default(),
            dpi: DEFAULT_DPI,
        }
    }
}

/// One render job.
///
/// Deserializes directly from a JSON job file; everything except `records`
/// and `output_dir` may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub records: Vec<Record>,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub column_order: Option<Vec<String>>,
    #[serde(default)]
    pub banner_path: Option<PathBuf>,
    #[serde(default)]
    pub banner_text: Option<String>,
    #[serde(default)]
    pub color_column: Option<String>,
    #[serde(default)]
    pub multi_header: Option<Vec<HeaderLayer>>,
    #[serde(default)]
    pub column_display: Option<HashMap<String, ColumnDisplay>>,
    #[serde(default)]
    pub replace_zero: bool,
    #[serde(default)]
    pub highlight_rules: HashMap<String, String>,
}

impl RenderRequest {
    pub fn new(records: Vec<Record>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            records,
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            column_order: self.column_order.clone(),
            multi_header: self.multi_header.clone(),
            column_display: self.column_display.clone(),
            replace_zero: self.replace_zero,
        }
    }

    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            color_column: self.color_column.clone().filter(|c| !c.is_empty()),
            highlight_rules: self.highlight_rules.clone(),
        }
    }
}

/// Renders report tables to PNG files.
#[derive(Debug, Clone)]
pub struct TableImageGenerator {
    style: TableStyle,
    fonts: FontSet,
    dpi: f64,
}

impl TableImageGenerator {
    /// Validate the configuration and load fonts once.
    pub fn new(config: GeneratorConfig) -> TableResult<Self> {
        let fonts = FontSet::load(&config.fonts);
        Self::with_fonts(config.style, fonts, config.dpi)
    }

    /// Build a generator around already-loaded faces.
    pub fn with_fonts(style: TableStyle, fonts: FontSet, dpi: f64) -> TableResult<Self> {
        style.validate().map_err(TableError::InvalidConfiguration)?;
        dpi_scale(dpi)?;
        Ok(Self { style, fonts, dpi })
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Paint a prepared table grid without touching the filesystem.
    pub fn render_table(&self, table: &TableData, options: &TableOptions) -> TableResult<RgbImage> {
        table.validate().map_err(TableError::InvalidConfiguration)?;
        let geometry = TableGeometry::compute(table, self.style.cell_height)?;
        let ctx = RenderContext::new(geometry, self.dpi, &self.style, &self.fonts)?;

        tracing::debug!(
            cols = geometry.total_cols,
            header_rows = geometry.header_rows,
            data_rows = geometry.data_rows,
            width = ctx.canvas_width,
            height = ctx.canvas_height,
            "Rendering table"
        );

        Ok(compose_table(table, options, &ctx))
    }

    /// Build and paint the full image for a request, banner included.
    pub fn render_image(&self, request: &RenderRequest) -> TableResult<RgbImage> {
        let table = build_table(&request.records, &request.build_options())?;
        let table_image = self.render_table(&table, &request.table_options())?;

        let banner = match &request.banner_path {
            Some(path) => load_banner(path)?,
            None => None,
        };

        Ok(match banner {
            Some(asset) => {
                let strip = compose_banner(&asset, request.banner_text.as_deref(), &self.style, &self.fonts);
                stack(&strip, &table_image)
            }
            None => table_image,
        })
    }

    /// Render a request and write it to `output_dir`, returning the file path.
    pub fn render(&self, request: &RenderRequest) -> TableResult<PathBuf> {
        let image = self.render_image(request)?;
        let bytes = encode_rgb(&image)?;
        let path = write_artifact(&request.output_dir, &bytes)?;

        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            bytes = bytes.len(),
            "Wrote table image"
        );

        Ok(path)
    }
}

/// Output file name for a unix timestamp and a four-digit suffix.
pub fn artifact_name(unix_seconds: i64, suffix: u16) -> String {
    format!("{}_{}_table.png", unix_seconds, suffix)
}

/// Write `bytes` to a fresh `<unix>_<suffix>_table.png` inside `dir`.
fn write_artifact(dir: &Path, bytes: &[u8]) -> TableResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = chrono::Utc::now().timestamp();
    let mut rng = rand::thread_rng();

    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(artifact_name(stamp, rng.gen_range(1000..=9999)));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                write_or_discard(file, &path, bytes)?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "Output name taken, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(TableError::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free output name in {} after {} attempts", dir.display(), MAX_NAME_ATTEMPTS),
    )))
}

/// Write `bytes` into a freshly created file, removing it again if the write
/// fails so no truncated image is left under its final name.
fn write_or_discard<W: Write>(mut out: W, path: &Path, bytes: &[u8]) -> TableResult<()> {
    let written = out.write_all(bytes).and_then(|()| out.flush());
    drop(out);

    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "Failed to remove partially written image"
            );
        }
        return Err(e.into());
    }
    Ok(())
}
