//! End-to-end tests: records in, PNG file on disk out.

use std::collections::HashMap;
use std::path::Path;

use table_common::{ColumnDisplay, TableStyle};
use table_renderer::{FontPaths, FontSet, GeneratorConfig, RenderRequest, TableImageGenerator, Weight};
use test_utils::{
    columns, generate_status_records, missing_font_path, require_font, score_records,
    status_header_layers, status_records, temp_test_dir, write_solid_png, STATUS_COLUMNS,
};

// ============================================================================
// Helper functions
// ============================================================================

fn builtin_generator(dpi: f64) -> TableImageGenerator {
    TableImageGenerator::with_fonts(TableStyle::default(), FontSet::builtin(), dpi).unwrap()
}

/// Split `<unix>_<suffix>_table.png` into its numeric parts.
fn parse_artifact_name(path: &Path) -> (i64, u16) {
    let name = path.file_name().unwrap().to_str().unwrap();
    let stem = name.strip_suffix("_table.png").expect("artifact suffix");
    let (stamp, suffix) = stem.split_once('_').expect("artifact separator");
    (stamp.parse().unwrap(), suffix.parse().unwrap())
}

fn score_request(output_dir: &Path) -> RenderRequest {
    let mut request = RenderRequest::new(score_records(), output_dir);
    request.column_order = Some(columns(&["name", "score"]));
    request.replace_zero = true;
    request
}

// ============================================================================
// Output file
// ============================================================================

#[test]
fn test_render_writes_named_png() {
    let dir = temp_test_dir();
    let generator = builtin_generator(150.0);

    let path = generator.render(&score_request(dir.path())).unwrap();

    assert_eq!(path.parent(), Some(dir.path()));
    let (stamp, suffix) = parse_artifact_name(&path);
    assert!(stamp > 1_600_000_000);
    assert!((1000..=9999).contains(&suffix));

    // 2 columns, 1 header + 2 data rows at 150 DPI
    let decoded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (1002, 377));
}

#[test]
fn test_decoded_file_matches_rendered_image() {
    let dir = temp_test_dir();
    let generator = builtin_generator(72.0);
    let request = score_request(dir.path());

    let expected = generator.render_image(&request).unwrap();
    let path = generator.render(&request).unwrap();
    let decoded = image::open(&path).unwrap().to_rgb8();

    assert_eq!(decoded, expected);
}

#[test]
fn test_output_directory_is_created() {
    let dir = temp_test_dir();
    let nested = dir.path().join("reports").join("daily");
    let path = builtin_generator(72.0).render(&score_request(&nested)).unwrap();
    assert!(path.starts_with(&nested));
    assert!(path.exists());
}

#[test]
fn test_repeated_renders_do_not_collide() {
    let dir = temp_test_dir();
    let generator = builtin_generator(72.0);
    let request = score_request(dir.path());

    let paths: Vec<_> = (0..5).map(|_| generator.render(&request).unwrap()).collect();
    for (i, a) in paths.iter().enumerate() {
        for b in &paths[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_request_without_columns_is_rejected() {
    let dir = temp_test_dir();
    let request = RenderRequest::new(Vec::new(), dir.path());
    let err = builtin_generator(72.0).render(&request).unwrap_err();
    assert_eq!(err.kind(), "InvalidConfiguration");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ============================================================================
// Banner
// ============================================================================

#[test]
fn test_banner_is_stacked_above_table() {
    let dir = temp_test_dir();
    let banner = write_solid_png(dir.path(), "banner.png", 940, 100, [200, 0, 0]);
    let mut request = score_request(&dir.path().join("out"));
    request.banner_path = Some(banner);

    let img = builtin_generator(150.0).render_image(&request).unwrap();

    // strip 20 + 200 + 20, table 1002x377 fitted to 1840 wide, bottom margin 40
    let table_height = 377 * 1840 / 1002;
    assert_eq!(img.dimensions(), (1920, 240 + table_height + 40));
    assert_eq!(img.get_pixel(960, 120).0, [200, 0, 0]);
    assert_eq!(img.get_pixel(10, 120).0, [255, 255, 255]);
}

#[test]
fn test_banner_caption_adds_height() {
    let dir = temp_test_dir();
    let banner = write_solid_png(dir.path(), "banner.png", 1880, 100, [0, 0, 200]);
    let mut request = score_request(dir.path());
    request.banner_path = Some(banner);

    let plain = builtin_generator(150.0).render_image(&request).unwrap();
    request.banner_text = Some("Weekly results".to_string());
    let captioned = builtin_generator(150.0).render_image(&request).unwrap();

    assert_eq!(captioned.height(), plain.height() + 60);
    let text_color = TableStyle::default().text_color.to_array();
    let caption_has_text = (140..200).any(|y| (0..1920).any(|x| captioned.get_pixel(x, y).0 == text_color));
    assert!(caption_has_text);
}

#[test]
fn test_missing_banner_renders_table_only() {
    let dir = temp_test_dir();
    let generator = builtin_generator(72.0);
    let table_only = generator.render_image(&score_request(dir.path())).unwrap();

    let mut request = score_request(dir.path());
    request.banner_path = Some(dir.path().join("no-banner.png"));
    request.banner_text = Some("ignored".to_string());
    let img = generator.render_image(&request).unwrap();

    assert_eq!(img, table_only);
}

#[test]
fn test_corrupt_banner_is_asset_missing() {
    let dir = temp_test_dir();
    let banner = dir.path().join("banner.png");
    std::fs::write(&banner, b"not an image").unwrap();
    let mut request = score_request(dir.path());
    request.banner_path = Some(banner);

    let err = builtin_generator(72.0).render(&request).unwrap_err();
    assert_eq!(err.kind(), "AssetMissing");
}

// ============================================================================
// Fonts and configuration
// ============================================================================

#[test]
fn test_missing_fonts_still_render() {
    let dir = temp_test_dir();
    let config = GeneratorConfig {
        fonts: FontPaths {
            regular: missing_font_path(),
            bold: missing_font_path(),
        },
        ..Default::default()
    };
    let generator = TableImageGenerator::new(config).unwrap();
    assert!(generator.fonts().face(Weight::Regular).is_builtin());

    let path = generator.render(&score_request(dir.path())).unwrap();
    assert!(path.exists());
}

#[test]
fn test_truetype_font_renders_text() {
    let font = require_font!();
    let dir = temp_test_dir();
    let config = GeneratorConfig {
        fonts: FontPaths {
            regular: font.clone(),
            bold: missing_font_path(),
        },
        dpi: 72.0,
        ..Default::default()
    };
    let generator = TableImageGenerator::new(config).unwrap();
    // bold falls back to the regular TrueType face, not the bitmap face
    assert!(!generator.fonts().face(Weight::Bold).is_builtin());

    let request = score_request(dir.path());
    let img = generator.render_image(&request).unwrap();
    let style = TableStyle::default();

    // some ink in the first data cell that is not the row fill or border
    let fill = style.row_color(0).to_array();
    let border = style.border_color.to_array();
    let inked = (62..118).any(|y| {
        (2..238).any(|x| {
            let px = img.get_pixel(x, y).0;
            px != fill && px != border
        })
    });
    assert!(inked);
}

#[test]
fn test_invalid_dpi_rejected() {
    let config = GeneratorConfig {
        dpi: 0.0,
        ..Default::default()
    };
    let err = TableImageGenerator::new(config).unwrap_err();
    assert_eq!(err.kind(), "InvalidConfiguration");
}

#[test]
fn test_config_from_json_keeps_defaults() {
    let config: GeneratorConfig = serde_json::from_str(
        r##"{"style": {"header_color": "#000000"}, "fonts": {"regular": "/fonts/r.ttf"}}"##,
    )
    .unwrap();
    assert_eq!(config.dpi, 150.0);
    assert_eq!(config.style.cell_height, 60);
    assert_eq!(config.style.header_color.to_hex(), "#000000");
    assert_eq!(config.fonts.regular, Path::new("/fonts/r.ttf"));
    assert_eq!(config.fonts.bold, FontPaths::default().bold);
}

// ============================================================================
// Full jobs
// ============================================================================

#[test]
fn test_status_board_job_from_json() {
    let dir = temp_test_dir();
    let job = serde_json::json!({
        "records": status_records(),
        "output_dir": dir.path(),
        "column_order": STATUS_COLUMNS,
        "multi_header": [{"Who": 1, "Outcome": 2, "Detail": 3}],
        "column_display": {"score": "Score", "created": "to_datetime"},
        "color_column": "status",
        "highlight_rules": {"result": "FAIL"},
        "replace_zero": true
    });
    let request: RenderRequest = serde_json::from_value(job).unwrap();
    assert_eq!(request.multi_header, Some(status_header_layers()));
    assert_eq!(
        request.column_display.as_ref().unwrap().get("created"),
        Some(&ColumnDisplay::from("to_datetime"))
    );

    let generator = builtin_generator(72.0);
    let img = generator.render_image(&request).unwrap();
    // 5 surviving columns, 2 header rows, 4 data rows
    assert_eq!(img.dimensions(), (5 * 240 + 1, 6 * 60 + 1));

    let style = TableStyle::default();
    // beta and delta contain FAIL
    assert_eq!(img.get_pixel(5, 185).0, style.summary_color.to_array());
    assert_eq!(img.get_pixel(5, 305).0, style.summary_color.to_array());
    assert_eq!(img.get_pixel(5, 125).0, style.row_color(0).to_array());

    assert!(generator.render(&request).unwrap().exists());
}

#[test]
fn test_many_rows_render() {
    let dir = temp_test_dir();
    let mut request = RenderRequest::new(generate_status_records(40), dir.path());
    request.color_column = Some("status".to_string());
    request.highlight_rules = HashMap::from([("result".to_string(), "FAIL".to_string())]);

    let img = builtin_generator(72.0).render_image(&request).unwrap();
    assert_eq!(img.dimensions(), (3 * 240 + 1, 41 * 60 + 1));
}
