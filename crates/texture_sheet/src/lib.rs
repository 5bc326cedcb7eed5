pub mod board;
pub mod layout;
mod paint;
mod sheet;
mod surface;
mod tile;

pub use paint::{
    color::Color,
    font::{
        glyph, glyph_bit, Font, FontFamily, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH, MAX_FONT_PX,
    },
    state::{PaintState, TextAlign, TextBaseline},
};
pub use sheet::{decorations, palette_color, Decoration, TextureSheetRenderer};
pub use surface::Surface;
pub use tile::{tile_rect, NeighbourCount, TileKind, TileRect};

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
    #[error("invalid font: {0:?}")]
    InvalidFont(String),
    #[error("tile index {0} is outside the sheet")]
    TileOutOfRange(u32),
    #[error("cell ({x}, {y}) is outside the board")]
    CellOutOfBounds { x: usize, y: usize },
}
