use std::fmt;
use std::str::FromStr;

use crate::SheetError;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Blank columns between adjacent glyphs, in unscaled glyph pixels.
pub const GLYPH_SPACING: u32 = 1;

/// Largest accepted font size.
pub const MAX_FONT_PX: u32 = 1024;

/// Fraction of the em box covered by a digit.
const CAP_HEIGHT_EM: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFamily {
    SansSerif,
    Serif,
    Monospace,
}

impl FontFamily {
    fn parse(value: &str) -> Option<Self> {
        match value.trim_matches(|c: char| c == '"' || c == '\'').to_ascii_lowercase().as_str() {
            "sans-serif" => Some(Self::SansSerif),
            "serif" => Some(Self::Serif),
            "monospace" => Some(Self::Monospace),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::SansSerif => "sans-serif",
            Self::Serif => "serif",
            Self::Monospace => "monospace",
        }
    }
}

/// Font description in canvas shorthand, e.g. `20px sans-serif`.
///
/// All families are drawn with the same built-in 5x7 bitmap face, scaled by an
/// integer factor so glyph edges stay on the pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    pub size_px: u32,
    pub family: FontFamily,
}

impl Default for Font {
    fn default() -> Self {
        Self { size_px: 10, family: FontFamily::SansSerif }
    }
}

impl Font {
    pub fn new(size_px: u32, family: FontFamily) -> Self {
        Self { size_px, family }
    }

    pub fn parse(value: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidFont(value.to_owned());

        let mut parts = value.split_whitespace();
        let size = parts.next().and_then(|size| size.strip_suffix("px")).ok_or_else(invalid)?;
        let size: f32 = size.parse().map_err(|_| invalid())?;
        if !size.is_finite() || size < 1.0 || size.round() > MAX_FONT_PX as f32 {
            return Err(invalid());
        }

        let family = parts.collect::<Vec<_>>().join(" ");
        let family = FontFamily::parse(&family).ok_or_else(invalid)?;

        Ok(Self { size_px: size.round() as u32, family })
    }

    /// Integer magnification applied to the bitmap face.
    pub fn scale(&self) -> u32 {
        let cap_height = self.size_px as f32 * CAP_HEIGHT_EM;
        ((cap_height / GLYPH_HEIGHT as f32).round() as u32).max(1)
    }

    pub fn glyph_size(&self) -> (u32, u32) {
        let scale = self.scale();
        (GLYPH_WIDTH.saturating_mul(scale), GLYPH_HEIGHT.saturating_mul(scale))
    }

    pub fn advance(&self) -> u32 {
        (GLYPH_WIDTH + GLYPH_SPACING).saturating_mul(self.scale())
    }

    /// Width of the inked text box, without trailing spacing.
    pub fn measure(&self, text: &str) -> u32 {
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0;
        }
        count.saturating_mul(self.advance()).saturating_sub(GLYPH_SPACING * self.scale())
    }
}

impl FromStr for Font {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family.as_str())
    }
}

/// Row bitmaps for a glyph, most significant of the low five bits is the leftmost column.
pub fn glyph(ch: char) -> Option<[u8; GLYPH_HEIGHT as usize]> {
    let rows = match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b01110, 0b10001, 0b00001, 0b00110, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ' ' => [0; GLYPH_HEIGHT as usize],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00100],
        ':' => [0b00000, 0b00100, 0b00100, 0b00000, 0b00100, 0b00100, 0b00000],
        '?' => [0b01110, 0b10001, 0b00001, 0b00110, 0b00100, 0b00000, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// Whether the glyph covers column `x`, row `y` of its unscaled cell.
pub fn glyph_bit(rows: &[u8; GLYPH_HEIGHT as usize], x: u32, y: u32) -> bool {
    x < GLYPH_WIDTH
        && y < GLYPH_HEIGHT
        && rows[y as usize] & (1 << (GLYPH_WIDTH - 1 - x)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canvas_shorthand() {
        let font = Font::parse("20px sans-serif").unwrap();
        assert_eq!(font, Font::new(20, FontFamily::SansSerif));
        assert_eq!(font.to_string(), "20px sans-serif");

        let font: Font = "12.4px 'monospace'".parse().unwrap();
        assert_eq!(font, Font::new(12, FontFamily::Monospace));
    }

    #[test]
    fn rejects_malformed_fonts() {
        for input in [
            "",
            "20 sans-serif",
            "px serif",
            "0px serif",
            "20px",
            "20px comic",
            "1025px serif",
            "1e30px sans-serif",
        ] {
            assert!(
                matches!(Font::parse(input), Err(SheetError::InvalidFont(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn label_font_metrics() {
        let font = Font::new(20, FontFamily::SansSerif);
        assert_eq!(font.scale(), 2);
        assert_eq!(font.glyph_size(), (10, 14));
        assert_eq!(font.advance(), 12);
        assert_eq!(font.measure("8"), 10);
        assert_eq!(font.measure("10"), 22);
        assert_eq!(font.measure(""), 0);
    }

    #[test]
    fn small_fonts_never_vanish() {
        assert_eq!(Font::new(1, FontFamily::Serif).scale(), 1);
        assert_eq!(Font::default().scale(), 1);
    }

    #[test]
    fn largest_font_is_accepted() {
        let font = Font::parse("1024px monospace").unwrap();
        assert_eq!(font.size_px, MAX_FONT_PX);
        assert_eq!(font.measure("10"), 2 * font.advance() - font.scale());
    }

    #[test]
    fn huge_sizes_saturate_instead_of_overflowing() {
        let font = Font::new(u32::MAX, FontFamily::SansSerif);
        assert!(font.measure("0123456789") >= font.advance());
        assert!(font.glyph_size().1 >= font.glyph_size().0);
    }

    #[test]
    fn every_digit_has_a_glyph() {
        for digit in '0'..='9' {
            let rows = glyph(digit).unwrap();
            assert!(rows.iter().any(|row| *row != 0), "{digit} is blank");
            assert!(rows.iter().all(|row| *row < 1 << GLYPH_WIDTH));
        }
        assert!(glyph('x').is_none());
    }

    #[test]
    fn glyph_bits_read_left_to_right() {
        let one = glyph('1').unwrap();
        assert!(glyph_bit(&one, 2, 0));
        assert!(!glyph_bit(&one, 0, 0));
        assert!(glyph_bit(&one, 1, 1));
        assert!(!glyph_bit(&one, 5, 0));
        assert!(!glyph_bit(&one, 0, 7));
    }
}
