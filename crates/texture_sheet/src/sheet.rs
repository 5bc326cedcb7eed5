use log::debug;

use crate::layout::{
    tile_center, tile_top, BACKGROUND_COLOR, CLEAR_COLOR, FIRST_DIGIT_TILE, INSET, INSET_COLOR,
    INSET_TILE, LABEL_FONT, LAST_DIGIT_TILE, MARKER_COLOR, MARKER_SIZE, MARKER_TILE,
    OUTLINE_OFFSET_Y, OUTLINE_TILE, PALETTE, SHEET_HEIGHT, SHEET_WIDTH, TILE_COUNT, TILE_SIZE,
};
use crate::paint::state::{TextAlign, TextBaseline};
use crate::surface::Surface;
use crate::SheetError;

/// One drawing rule applied to a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoration {
    /// Stroked border in the current stroke color.
    Outline,
    /// Small square dot in the tile center.
    Marker,
    /// Square inset from the tile edges.
    Inset,
    /// Centered number label.
    Digit { label: String, color: &'static str },
}

impl Decoration {
    fn apply(&self, surface: &mut Surface, index: u32) -> Result<(), SheetError> {
        let top = tile_top(index) as f32;
        let (center_x, center_y) = tile_center(index);
        let size = TILE_SIZE as f32;

        match self {
            Decoration::Outline => {
                surface.stroke_rect(0.0, top + OUTLINE_OFFSET_Y, size, size);
            },
            Decoration::Marker => {
                let half = (MARKER_SIZE / 2) as f32;
                surface.set_fill_style(MARKER_COLOR)?;
                surface.fill_rect(
                    center_x as f32 - half,
                    center_y as f32 - half,
                    MARKER_SIZE as f32,
                    MARKER_SIZE as f32,
                );
            },
            Decoration::Inset => {
                let inset = INSET as f32;
                surface.set_fill_style(INSET_COLOR)?;
                surface.fill_rect(inset, top + inset, size - 2.0 * inset, size - 2.0 * inset);
            },
            Decoration::Digit { label, color } => {
                surface.set_fill_style(color)?;
                surface.fill_text(label, center_x as f32, center_y as f32);
            },
        }

        Ok(())
    }
}

/// Label color of a digit tile, `None` for every other tile.
pub fn palette_color(index: u32) -> Option<&'static str> {
    if (FIRST_DIGIT_TILE..=LAST_DIGIT_TILE).contains(&index) {
        PALETTE.get(index as usize - 1).copied()
    } else {
        None
    }
}

/// Rules for tile `index`, in drawing order.
///
/// Rules are not exclusive; later entries paint over earlier ones.
pub fn decorations(index: u32) -> Vec<Decoration> {
    let mut rules = Vec::new();

    if index == OUTLINE_TILE {
        rules.push(Decoration::Outline);
    }
    if index == MARKER_TILE {
        rules.push(Decoration::Marker);
    }
    if index == INSET_TILE {
        rules.push(Decoration::Inset);
    }
    if let Some(color) = palette_color(index) {
        rules.push(Decoration::Digit { label: index.to_string(), color });
    }

    rules
}

/// Draws the numbered placeholder tile sheet.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextureSheetRenderer;

impl TextureSheetRenderer {
    /// Render the sheet onto a fresh surface.
    pub fn render(&self) -> Result<Surface, SheetError> {
        let mut surface = Surface::new(SHEET_WIDTH, SHEET_HEIGHT);
        self.draw(&mut surface)?;
        Ok(surface)
    }

    /// Render the sheet onto `surface`, leaving the paint state as the last tile left it.
    pub fn draw(&self, surface: &mut Surface) -> Result<(), SheetError> {
        surface.set_font(LABEL_FONT)?;
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);

        for color in [CLEAR_COLOR, BACKGROUND_COLOR] {
            surface.set_fill_style(color)?;
            surface.fill_rect(0.0, 0.0, SHEET_WIDTH as f32, SHEET_HEIGHT as f32);
        }

        for index in 0..TILE_COUNT {
            let rules = decorations(index);
            debug!("tile {index}: {rules:?}");
            for rule in &rules {
                rule.apply(surface, index)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifth_digit_is_yellow() {
        assert_eq!(palette_color(5), Some("yellow"));
    }

    #[test]
    fn palette_only_covers_digit_tiles() {
        assert_eq!(palette_color(0), None);
        assert_eq!(palette_color(1), Some("red"));
        assert_eq!(palette_color(8), Some("teal"));
        assert_eq!(palette_color(9), None);
        assert_eq!(palette_color(100), None);
    }

    #[test]
    fn rules_per_tile() {
        assert_eq!(decorations(0), vec![Decoration::Outline]);
        assert_eq!(decorations(9), vec![Decoration::Marker]);
        assert_eq!(decorations(10), vec![]);
        assert_eq!(decorations(11), vec![Decoration::Inset]);
        assert_eq!(decorations(7), vec![Decoration::Digit {
            label: "7".to_owned(),
            color: "black"
        }]);
    }

    #[test]
    fn paint_state_after_render() {
        let surface = TextureSheetRenderer.render().unwrap();
        let paint = surface.paint();
        assert_eq!(paint.font.to_string(), "20px sans-serif");
        assert_eq!(paint.align, TextAlign::Center);
        assert_eq!(paint.baseline, TextBaseline::Middle);
        // Tile 11 sets the fill last.
        assert_eq!(paint.fill.to_string(), "#888888");
    }
}
