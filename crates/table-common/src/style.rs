//! Style configuration for rendered tables.
//!
//! A [`TableStyle`] is built once per generator and never mutated while
//! rendering. Every field has a default, so a partial JSON/YAML document
//! only needs to name the values it overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color, serialized as `"#RRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or a small set of named colors.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let trimmed = s.trim();
        if let Some(named) = named_color(trimmed) {
            return Ok(named);
        }

        let hex = trimmed.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => {
                // #RGB shorthand doubles each nibble
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorParseError(s.to_string())),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Error returned for a color string that is neither hex nor a known name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0:?}")]
pub struct ColorParseError(pub String);

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// Colors and base sizes used when painting a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    /// Header background
    pub header_color: Color,
    /// Header text
    pub header_text_color: Color,
    /// Alternating data row backgrounds (even, odd)
    pub row_colors: [Color; 2],
    /// Cell border stroke
    pub border_color: Color,
    /// Background for highlighted rows
    pub summary_color: Color,
    /// Default data text
    pub text_color: Color,
    /// Text color for placeholder (`-`) values
    pub empty_text_color: Color,
    /// Status value -> text color, applied only inside the color column
    pub status_colors: HashMap<String, Color>,
    /// Cell height in pixels at 72 DPI
    pub cell_height: u32,
    /// Font size in pixels at 72 DPI
    pub font_size: u32,
    /// Horizontal breathing room text is expected to keep inside a cell
    pub padding: u32,
}

impl Default for TableStyle {
    fn default() -> Self {
        let status_colors = HashMap::from([
            ("绿灯".to_string(), Color::rgb(0x05, 0x96, 0x69)),
            ("红灯".to_string(), Color::rgb(0xDC, 0x26, 0x26)),
            ("黄灯".to_string(), Color::rgb(0xD9, 0x77, 0x06)),
        ]);

        Self {
            header_color: Color::rgb(0x94, 0xA3, 0xB8),
            header_text_color: Color::WHITE,
            row_colors: [Color::WHITE, Color::rgb(0xF9, 0xFA, 0xFB)],
            border_color: Color::rgb(0xE5, 0xE7, 0xEB),
            summary_color: Color::rgb(0xE2, 0xE8, 0xF0),
            text_color: Color::rgb(0x11, 0x18, 0x27),
            empty_text_color: Color::rgb(0x9C, 0xA3, 0xAF),
            status_colors,
            cell_height: 60,
            font_size: 24,
            padding: 20,
        }
    }
}

impl TableStyle {
    /// Parse a (possibly partial) style from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Background for a data row that is not highlighted.
    pub fn row_color(&self, row_index: usize) -> Color {
        self.row_colors[row_index % 2]
    }

    /// Text color for a status value, if it is a known status.
    pub fn status_color(&self, text: &str) -> Option<Color> {
        self.status_colors.get(text).copied()
    }

    /// Check values that would make rendering impossible.
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_height == 0 {
            return Err("cell_height must be greater than 0".to_string());
        }
        if self.font_size == 0 {
            return Err("font_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00ff00"), Ok(Color::rgb(0, 255, 0)));
        assert_eq!(Color::from_hex("#fff"), Ok(Color::WHITE));
        assert_eq!(Color::from_hex("white"), Ok(Color::WHITE));
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#绿绿").is_err());
    }

    #[test]
    fn test_color_hex_roundtrip_uppercase() {
        let c = Color::from_hex("#94a3b8").unwrap();
        assert_eq!(c.to_hex(), "#94A3B8");
    }

    #[test]
    fn test_default_style_values() {
        let style = TableStyle::default();
        assert_eq!(style.header_color.to_hex(), "#94A3B8");
        assert_eq!(style.row_color(0), Color::WHITE);
        assert_eq!(style.row_color(3).to_hex(), "#F9FAFB");
        assert_eq!(style.status_color("红灯").map(|c| c.to_hex()), Some("#DC2626".to_string()));
        assert_eq!(style.status_color("unknown"), None);
        assert_eq!(style.cell_height, 60);
        assert_eq!(style.font_size, 24);
    }

    #[test]
    fn test_partial_style_json_keeps_defaults() {
        let style = TableStyle::from_json(r##"{"header_color": "#000000", "cell_height": 40}"##)
            .unwrap();
        assert_eq!(style.header_color, Color::BLACK);
        assert_eq!(style.cell_height, 40);
        assert_eq!(style.font_size, 24);
        assert_eq!(style.border_color.to_hex(), "#E5E7EB");
    }

    #[test]
    fn test_invalid_color_in_json_rejected() {
        assert!(TableStyle::from_json(r#"{"text_color": "not-a-color"}"#).is_err());
    }

    #[test]
    fn test_validate() {
        let mut style = TableStyle::default();
        assert!(style.validate().is_ok());
        style.font_size = 0;
        assert!(style.validate().is_err());
    }
}
