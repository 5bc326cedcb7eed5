//! Fixed geometry and colors of the tile sheet.

pub const TILE_SIZE: u32 = 32;
pub const TILE_COUNT: u32 = 12;
pub const SHEET_WIDTH: u32 = TILE_SIZE;
pub const SHEET_HEIGHT: u32 = TILE_SIZE * TILE_COUNT;

/// Label colors for the digit tiles, indexed by `digit - 1`.
pub const PALETTE: [&str; 8] =
    ["red", "green", "blue", "purple", "yellow", "orange", "black", "teal"];

pub const CLEAR_COLOR: &str = "white";
pub const BACKGROUND_COLOR: &str = "#aaa";
pub const MARKER_COLOR: &str = "red";
pub const INSET_COLOR: &str = "#888";
pub const LABEL_FONT: &str = "20px sans-serif";

pub const OUTLINE_TILE: u32 = 0;
pub const MARKER_TILE: u32 = 9;
pub const INSET_TILE: u32 = 11;
pub const FIRST_DIGIT_TILE: u32 = 1;
pub const LAST_DIGIT_TILE: u32 = 8;

/// The outline sits one pixel above tile 0, so its top edge is clipped.
pub const OUTLINE_OFFSET_Y: f32 = -1.0;
pub const MARKER_SIZE: u32 = 6;
pub const INSET: u32 = 2;

/// Top edge of tile `index` on the sheet.
pub const fn tile_top(index: u32) -> u32 {
    index * TILE_SIZE
}

/// Center of tile `index` on the sheet.
pub const fn tile_center(index: u32) -> (u32, u32) {
    (TILE_SIZE / 2, tile_top(index) + TILE_SIZE / 2)
}
