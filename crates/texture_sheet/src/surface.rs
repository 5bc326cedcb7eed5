use image::{GenericImageView, RgbaImage, SubImage};
use log::trace;

use crate::paint::color::Color;
use crate::paint::font::{glyph, glyph_bit, Font, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::paint::state::{PaintState, TextAlign, TextBaseline};
use crate::tile::tile_rect;
use crate::SheetError;

/// Axis-aligned region in surface coordinates, `x0 <= x1` and `y0 <= y1`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Span {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl Span {
    fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x0: x, y0: y, x1: x + width, y1: y + height }
    }

    fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Area of this span inside the unit pixel at (`px`, `py`).
    fn coverage(&self, px: f32, py: f32) -> f32 {
        let w = (self.x1.min(px + 1.0) - self.x0.max(px)).max(0.0);
        let h = (self.y1.min(py + 1.0) - self.y0.max(py)).max(0.0);
        w * h
    }
}

/// RGBA raster target with a persistent paint state.
#[derive(Clone, Debug)]
pub struct Surface {
    image: RgbaImage,
    paint: PaintState,
}

impl Surface {
    /// Fully transparent surface with a default paint state.
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height), paint: PaintState::default() }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn paint(&self) -> &PaintState {
        &self.paint
    }

    pub fn paint_mut(&mut self) -> &mut PaintState {
        &mut self.paint
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(Color::from(*self.image.get_pixel(x, y)))
    }

    /// Read-only 32x32 view of tile `index`.
    pub fn tile_view(&self, index: u32) -> Result<SubImage<&RgbaImage>, SheetError> {
        let rect = tile_rect(index)?;
        if rect.y + rect.height > self.height() || rect.width > self.width() {
            return Err(SheetError::TileOutOfRange(index));
        }
        Ok(self.image.view(rect.x, rect.y, rect.width, rect.height))
    }

    /// Reset every pixel to transparent black. The paint state is kept.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Color::TRANSPARENT.into();
        }
    }

    pub fn set_fill_style(&mut self, style: &str) -> Result<(), SheetError> {
        self.paint.fill = Color::parse(style)?;
        Ok(())
    }

    pub fn set_stroke_style(&mut self, style: &str) -> Result<(), SheetError> {
        self.paint.stroke = Color::parse(style)?;
        Ok(())
    }

    pub fn set_font(&mut self, font: &str) -> Result<(), SheetError> {
        self.paint.font = Font::parse(font)?;
        Ok(())
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.paint.align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.paint.baseline = baseline;
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        trace!("fill_rect({x}, {y}, {width}, {height}) with {}", self.paint.fill);
        let span = Span::new(x, y, width, height);
        self.composite(&[span], self.paint.fill);
    }

    /// Outline a rectangle with a line straddling its edges.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        trace!("stroke_rect({x}, {y}, {width}, {height}) with {}", self.paint.stroke);
        let line_width = self.paint.line_width;
        if width <= 0.0 || height <= 0.0 || line_width <= 0.0 {
            return;
        }

        let half = line_width / 2.0;
        let outer = Span::new(x - half, y - half, width + line_width, height + line_width);
        let inner = Span::new(x + half, y + half, width - line_width, height - line_width);

        let spans = if inner.is_empty() {
            vec![outer]
        } else {
            vec![
                Span { y1: inner.y0, ..outer },
                Span { y0: inner.y1, ..outer },
                Span { x0: outer.x0, y0: inner.y0, x1: inner.x0, y1: inner.y1 },
                Span { x0: inner.x1, y0: inner.y0, x1: outer.x1, y1: inner.y1 },
            ]
        };
        self.composite(&spans, self.paint.stroke);
    }

    /// Advance width of `text` in the current font.
    pub fn measure_text(&self, text: &str) -> f32 {
        self.paint.font.measure(text) as f32
    }

    /// Draw `text` anchored at (`x`, `y`) using the current font, alignment and baseline.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        trace!("fill_text({text:?}, {x}, {y}) with {}", self.paint.fill);
        let font = self.paint.font;
        let scale = font.scale() as f32;
        let (_, height) = font.glyph_size();

        let left = x + self.paint.align.offset(self.measure_text(text));
        let top = y + self.paint.baseline.offset(height as f32);

        let mut spans = Vec::new();
        for (position, ch) in text.chars().enumerate() {
            let Some(rows) = glyph(ch) else {
                continue;
            };

            let origin = left + (position as f32) * font.advance() as f32;
            for gy in 0..GLYPH_HEIGHT {
                for gx in 0..GLYPH_WIDTH {
                    if glyph_bit(&rows, gx, gy) {
                        let cell_x = origin + gx as f32 * scale;
                        let cell_y = top + gy as f32 * scale;
                        spans.push(Span::new(cell_x, cell_y, scale, scale));
                    }
                }
            }
        }
        self.composite(&spans, self.paint.fill);
    }

    /// Blend `color` over every pixel touched by `spans`, weighted by area coverage.
    ///
    /// Spans must not overlap each other.
    fn composite(&mut self, spans: &[Span], color: Color) {
        let spans: Vec<&Span> = spans.iter().filter(|span| !span.is_empty()).collect();
        if spans.is_empty() || color.a == 0 {
            return;
        }

        let x0 = spans.iter().map(|span| span.x0).fold(f32::INFINITY, f32::min);
        let y0 = spans.iter().map(|span| span.y0).fold(f32::INFINITY, f32::min);
        let x1 = spans.iter().map(|span| span.x1).fold(f32::NEG_INFINITY, f32::max);
        let y1 = spans.iter().map(|span| span.y1).fold(f32::NEG_INFINITY, f32::max);

        let (width, height) = (self.width() as f32, self.height() as f32);
        let start_x = x0.floor().max(0.0) as u32;
        let start_y = y0.floor().max(0.0) as u32;
        let end_x = x1.ceil().min(width).max(0.0) as u32;
        let end_y = y1.ceil().min(height).max(0.0) as u32;

        for py in start_y..end_y {
            for px in start_x..end_x {
                let coverage: f32 =
                    spans.iter().map(|span| span.coverage(px as f32, py as f32)).sum();
                if coverage <= 0.0 {
                    continue;
                }

                let pixel = self.image.get_pixel_mut(px, py);
                let blended = blend(Color::from(*pixel), color, coverage.min(1.0));
                *pixel = blended.into();
            }
        }
    }
}

/// Source-over compositing of `src` scaled by `coverage` onto `dst`.
fn blend(dst: Color, src: Color, coverage: f32) -> Color {
    let src_a = src.a as f32 / 255.0 * coverage;
    let dst_a = dst.a as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        let value = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Color::rgba(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: Color = Color::rgb(170, 170, 170);

    fn gray_surface(width: u32, height: u32) -> Surface {
        let mut surface = Surface::new(width, height);
        surface.set_fill_style("#aaa").unwrap();
        surface.fill_rect(0.0, 0.0, width as f32, height as f32);
        surface
    }

    #[test]
    fn new_surface_is_transparent() {
        let surface = Surface::new(4, 4);
        assert_eq!(surface.pixel(3, 3), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn aligned_fill_is_crisp() {
        let mut surface = gray_surface(8, 8);
        surface.set_fill_style("red").unwrap();
        surface.fill_rect(2.0, 3.0, 2.0, 1.0);

        for y in 0..8 {
            for x in 0..8 {
                let expected =
                    if (2..4).contains(&x) && y == 3 { Color::rgb(255, 0, 0) } else { GRAY };
                assert_eq!(surface.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn fractional_fill_blends_by_area() {
        let mut surface = gray_surface(4, 1);
        surface.set_fill_style("black").unwrap();
        surface.fill_rect(0.5, 0.0, 1.0, 1.0);

        assert_eq!(surface.pixel(0, 0), Some(Color::rgb(85, 85, 85)));
        assert_eq!(surface.pixel(1, 0), Some(Color::rgb(85, 85, 85)));
        assert_eq!(surface.pixel(2, 0), Some(GRAY));
    }

    #[test]
    fn fill_outside_is_clipped() {
        let mut surface = gray_surface(4, 4);
        surface.set_fill_style("red").unwrap();
        surface.fill_rect(-10.0, -10.0, 5.0, 5.0);
        surface.fill_rect(10.0, 0.0, 5.0, 5.0);
        surface.fill_rect(1.0, 1.0, 0.0, 2.0);
        assert!(surface.image().pixels().all(|pixel| Color::from(*pixel) == GRAY));
    }

    #[test]
    fn stroke_straddles_edges() {
        let mut surface = gray_surface(8, 8);
        surface.stroke_rect(1.0, 1.0, 6.0, 6.0);

        let half = Some(Color::rgb(85, 85, 85));
        assert_eq!(surface.pixel(0, 3), half);
        assert_eq!(surface.pixel(1, 3), half);
        assert_eq!(surface.pixel(3, 0), half);
        assert_eq!(surface.pixel(3, 7), half);
        assert_eq!(surface.pixel(7, 3), half);
        assert_eq!(surface.pixel(3, 3), Some(GRAY));
        assert_eq!(surface.pixel(2, 2), Some(GRAY));
    }

    #[test]
    fn degenerate_stroke_draws_nothing() {
        let mut surface = gray_surface(4, 4);
        surface.stroke_rect(1.0, 1.0, 0.0, 2.0);
        surface.paint_mut().line_width = 0.0;
        surface.stroke_rect(1.0, 1.0, 2.0, 2.0);
        assert!(surface.image().pixels().all(|pixel| Color::from(*pixel) == GRAY));
    }

    #[test]
    fn thick_stroke_on_small_rect_fills_solid() {
        let mut surface = gray_surface(6, 6);
        surface.paint_mut().line_width = 4.0;
        surface.stroke_rect(2.0, 2.0, 2.0, 2.0);
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(surface.pixel(x, y), Some(Color::BLACK), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn centered_text_matches_glyph_bitmap() {
        let mut surface = gray_surface(32, 32);
        surface.set_font("20px sans-serif").unwrap();
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.set_fill_style("blue").unwrap();
        surface.fill_text("3", 16.0, 16.0);

        let rows = glyph('3').unwrap();
        for y in 0..32 {
            for x in 0..32 {
                let inside = (11..21).contains(&x) && (9..23).contains(&y);
                let ink = inside && glyph_bit(&rows, (x - 11) / 2, (y - 9) / 2);
                let expected = if ink { Color::rgb(0, 0, 255) } else { GRAY };
                assert_eq!(surface.pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn text_anchor_follows_alignment() {
        let mut surface = gray_surface(32, 16);
        surface.set_text_baseline(TextBaseline::Top);
        surface.set_text_align(TextAlign::End);
        surface.fill_text("-", 10.0, 0.0);

        // Default 10px font draws at scale 1; '-' inks row 3, columns 0..5.
        for x in 0..32 {
            let expected = if (5..10).contains(&x) { Color::BLACK } else { GRAY };
            assert_eq!(surface.pixel(x, 3), Some(expected), "pixel ({x}, 3)");
        }
    }

    #[test]
    fn unknown_characters_advance_silently() {
        let mut surface = gray_surface(32, 16);
        surface.set_text_baseline(TextBaseline::Top);
        surface.fill_text("x-", 0.0, 0.0);
        assert_eq!(surface.pixel(0, 3), Some(GRAY));
        assert_eq!(surface.pixel(6, 3), Some(Color::BLACK));
        assert_eq!(surface.measure_text("x-"), 11.0);
    }

    #[test]
    fn translucent_fill_over_transparent() {
        let mut surface = Surface::new(1, 1);
        surface.set_fill_style("#ff000080").unwrap();
        surface.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(surface.pixel(0, 0), Some(Color::rgba(255, 0, 0, 128)));
    }

    #[test]
    fn invalid_styles_leave_state_untouched() {
        let mut surface = Surface::new(1, 1);
        assert!(surface.set_fill_style("nope").is_err());
        assert!(surface.set_font("huge").is_err());
        assert_eq!(*surface.paint(), PaintState::default());
    }

    #[test]
    fn oversized_font_is_rejected_before_drawing() {
        let mut surface = gray_surface(32, 32);
        assert!(matches!(
            surface.set_font("1e30px sans-serif"),
            Err(SheetError::InvalidFont(_))
        ));
        surface.fill_text("10", 16.0, 16.0);

        surface.paint_mut().font = Font::new(u32::MAX, crate::paint::font::FontFamily::Serif);
        surface.set_text_align(TextAlign::Center);
        surface.fill_text("10", 16.0, 16.0);
    }

    #[test]
    fn clear_keeps_paint_state() {
        let mut surface = gray_surface(3, 3);
        surface.clear();
        assert!(surface.image().pixels().all(|pixel| Color::from(*pixel) == Color::TRANSPARENT));
        assert_eq!(surface.paint().fill, Color::rgb(170, 170, 170));
    }

    #[test]
    fn tile_view_requires_full_tile() {
        let surface = Surface::new(32, 40);
        assert_eq!(surface.tile_view(0).unwrap().dimensions(), (32, 32));
        assert!(matches!(surface.tile_view(1), Err(SheetError::TileOutOfRange(1))));
    }
}
