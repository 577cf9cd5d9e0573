//! Banner strip and the final banner-over-table stack.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::path::Path;
use table_common::{TableError, TableResult, TableStyle};

use crate::font::{FontSet, Weight};

pub const BANNER_WIDTH: u32 = 1920;
/// Margin around the banner asset inside the strip.
pub const BANNER_MARGIN: u32 = 20;
/// Extra strip height reserved for a caption.
pub const CAPTION_HEIGHT: u32 = 60;
/// Caption size in pixels; not DPI-scaled.
pub const CAPTION_FONT_SIZE: f32 = 30.0;
/// Gap between the banner asset and the caption.
pub const CAPTION_GAP: u32 = 20;
/// Side and bottom margin around the table in the stacked output.
pub const TABLE_MARGIN: u32 = 40;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Load a banner asset.
///
/// A path that does not exist yields `Ok(None)`; a file that exists but cannot
/// be decoded is an error.
pub fn load_banner(path: &Path) -> TableResult<Option<RgbImage>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Banner not found, rendering table only");
        return Ok(None);
    }

    let image = image::open(path)
        .map_err(|e| TableError::AssetMissing(format!("{}: {}", path.display(), e)))?;
    Ok(Some(image.to_rgb8()))
}

/// Build the banner strip: the asset scaled to the strip width with margins,
/// and an optional centered caption below it.
pub fn compose_banner(asset: &RgbImage, caption: Option<&str>, style: &TableStyle, fonts: &FontSet) -> RgbImage {
    let caption = caption.filter(|text| !text.is_empty());
    let inner_width = BANNER_WIDTH - 2 * BANNER_MARGIN;
    let (asset_width, asset_height) = asset.dimensions();
    let inner_height =
        ((asset_height as u64 * inner_width as u64) / asset_width.max(1) as u64).max(1) as u32;
    let resized = imageops::resize(asset, inner_width, inner_height, FilterType::CatmullRom);

    let caption_height = if caption.is_some() { CAPTION_HEIGHT } else { 0 };
    let total_height = BANNER_MARGIN + inner_height + caption_height + BANNER_MARGIN;
    let mut strip = RgbImage::from_pixel(BANNER_WIDTH, total_height, WHITE);
    imageops::replace(&mut strip, &resized, BANNER_MARGIN as i64, BANNER_MARGIN as i64);

    if let Some(text) = caption {
        let face = fonts.face(Weight::Bold);
        let extent = face.measure(text, CAPTION_FONT_SIZE);
        let text_x = (BANNER_WIDTH as i32 - extent.width as i32) / 2;
        let text_y = (BANNER_MARGIN + inner_height + CAPTION_GAP) as i32;
        face.draw(
            &mut strip,
            Rgb(style.text_color.to_array()),
            text_x,
            text_y,
            CAPTION_FONT_SIZE,
            text,
        );
    }

    strip
}

/// Stack the banner strip above the table, fitting the table to the strip's
/// width minus side margins.
pub fn stack(banner: &RgbImage, table: &RgbImage) -> RgbImage {
    let target_width = banner.width().saturating_sub(2 * TABLE_MARGIN).max(1);
    let fitted;
    let table = if table.width() != target_width {
        let height = ((table.height() as u64 * target_width as u64) / table.width().max(1) as u64).max(1) as u32;
        tracing::debug!(
            from = table.width(),
            to = target_width,
            "Resizing table to banner width"
        );
        fitted = imageops::resize(table, target_width, height, FilterType::Lanczos3);
        &fitted
    } else {
        table
    };

    let mut combined = RgbImage::from_pixel(
        banner.width(),
        banner.height() + table.height() + TABLE_MARGIN,
        WHITE,
    );
    imageops::replace(&mut combined, banner, 0, 0);
    imageops::replace(&mut combined, table, TABLE_MARGIN as i64, banner.height() as i64);
    combined
}
