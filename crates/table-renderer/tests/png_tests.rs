//! Tests for PNG encoding of rendered tables.
//!
//! Tests the indexed and RGBA encoders, including:
//! - Format selection by color count
//! - Lossless round trip through a standard decoder

use image::{Rgb, RgbImage};
use table_renderer::png::{create_png, create_png_auto, create_png_indexed, encode_rgb};

// ============================================================================
// Helper functions
// ============================================================================

/// PNG color type byte from the IHDR chunk.
fn color_type(png: &[u8]) -> u8 {
    // signature (8) + length (4) + "IHDR" (4) + width (4) + height (4) + depth (1)
    png[25]
}

/// A table-like image: flat fills and a handful of text colors.
fn flat_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| match (x % 60, y % 30) {
        (0, _) | (_, 0) => Rgb([229, 231, 235]),
        (20..=30, 10..=20) => Rgb([17, 24, 39]),
        _ if (y / 30) % 2 == 0 => Rgb([255, 255, 255]),
        _ => Rgb([249, 250, 251]),
    })
}

/// An image with far more than 256 colors.
fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]))
}

// ============================================================================
// Format selection
// ============================================================================

#[test]
fn test_flat_image_uses_indexed_png() {
    let png = encode_rgb(&flat_image(240, 120)).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_many_colors_fall_back_to_rgba() {
    let png = encode_rgb(&gradient_image(256, 64)).unwrap();
    assert_eq!(color_type(&png), 6);
}

#[test]
fn test_indexed_smaller_than_rgba_for_flat_fills() {
    let img = flat_image(480, 240);
    let rgba: Vec<u8> = img.pixels().flat_map(|p| [p[0], p[1], p[2], 255]).collect();

    let indexed = create_png_auto(&rgba, 480, 240).unwrap();
    let full = create_png(&rgba, 480, 240).unwrap();
    assert!(indexed.len() < full.len());
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_indexed_round_trip_is_lossless() {
    let img = flat_image(181, 97);
    let decoded = image::load_from_memory(&encode_rgb(&img).unwrap()).unwrap().to_rgb8();
    assert_eq!(decoded, img);
}

#[test]
fn test_rgba_round_trip_is_lossless() {
    let img = gradient_image(300, 20);
    let decoded = image::load_from_memory(&encode_rgb(&img).unwrap()).unwrap().to_rgb8();
    assert_eq!(decoded, img);
}

#[test]
fn test_indexed_with_transparency_decodes() {
    let palette = [(255, 0, 0, 255), (0, 0, 0, 0)];
    let indices = [0, 1, 1, 0];
    let png = create_png_indexed(2, 2, &palette, &indices).unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_palette_rejected() {
    let err = create_png_indexed(1, 1, &[], &[0]).unwrap_err();
    assert_eq!(err.kind(), "EncodeFailure");
}
