use std::fmt;

use crate::layout::{tile_top, TILE_COUNT, TILE_SIZE};
use crate::SheetError;

/// Pixel region of one tile on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn tile_rect(index: u32) -> Result<TileRect, SheetError> {
    if index >= TILE_COUNT {
        return Err(SheetError::TileOutOfRange(index));
    }
    Ok(TileRect { x: 0, y: tile_top(index), width: TILE_SIZE, height: TILE_SIZE })
}

/// Number of bombs around an opened cell, always in 1..=8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeighbourCount(u8);

impl NeighbourCount {
    pub fn new(count: u8) -> Option<Self> {
        (1..=8).contains(&count).then_some(Self(count))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// What a tile depicts when the sheet is used as a minesweeper atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Unopened cell.
    Unknown,
    /// Opened cell with 1 to 8 neighbouring bombs.
    Count(NeighbourCount),
    Bomb,
    /// Opened cell without neighbouring bombs.
    Empty,
    Flag,
}

impl TileKind {
    pub fn from_index(index: u32) -> Result<Self, SheetError> {
        let kind = match index {
            0 => TileKind::Unknown,
            1..=8 => TileKind::Count(NeighbourCount(index as u8)),
            9 => TileKind::Bomb,
            10 => TileKind::Empty,
            11 => TileKind::Flag,
            _ => return Err(SheetError::TileOutOfRange(index)),
        };
        Ok(kind)
    }

    /// Tile for an opened cell with `neighbours` adjacent bombs.
    pub fn for_neighbours(neighbours: u8) -> Option<Self> {
        match neighbours {
            0 => Some(TileKind::Empty),
            _ => NeighbourCount::new(neighbours).map(TileKind::Count),
        }
    }

    /// Sheet index of this tile.
    pub fn index(self) -> u32 {
        match self {
            TileKind::Unknown => 0,
            TileKind::Count(count) => u32::from(count.get()),
            TileKind::Bomb => 9,
            TileKind::Empty => 10,
            TileKind::Flag => 11,
        }
    }

    pub fn all() -> impl Iterator<Item = TileKind> {
        (0..TILE_COUNT).filter_map(|index| TileKind::from_index(index).ok())
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Unknown => f.write_str("unknown"),
            TileKind::Count(count) => write!(f, "count {}", count.get()),
            TileKind::Bomb => f.write_str("bomb"),
            TileKind::Empty => f.write_str("empty"),
            TileKind::Flag => f.write_str("flag"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_every_index_once() {
        let indices: Vec<u32> = TileKind::all().map(TileKind::index).collect();
        assert_eq!(indices, (0..TILE_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn index_round_trips_through_kind() {
        assert_eq!(TileKind::from_index(0).unwrap(), TileKind::Unknown);
        assert_eq!(TileKind::from_index(5).unwrap(), TileKind::Count(NeighbourCount(5)));
        assert_eq!(TileKind::from_index(9).unwrap(), TileKind::Bomb);
        assert_eq!(TileKind::from_index(10).unwrap(), TileKind::Empty);
        assert_eq!(TileKind::from_index(11).unwrap(), TileKind::Flag);
        assert!(matches!(TileKind::from_index(12), Err(SheetError::TileOutOfRange(12))));
    }

    #[test]
    fn neighbour_counts() {
        assert_eq!(TileKind::for_neighbours(0), Some(TileKind::Empty));
        assert_eq!(TileKind::for_neighbours(3).map(TileKind::index), Some(3));
        assert_eq!(TileKind::for_neighbours(9), None);
    }

    #[test]
    fn counts_outside_one_to_eight_are_rejected() {
        assert_eq!(NeighbourCount::new(0), None);
        assert_eq!(NeighbourCount::new(9), None);
        assert_eq!(NeighbourCount::new(200), None);
        assert_eq!(NeighbourCount::new(8).map(NeighbourCount::get), Some(8));
        let kind = TileKind::Count(NeighbourCount::new(6).unwrap());
        assert_eq!(kind.index(), 6);
        assert_eq!(kind.to_string(), "count 6");
    }

    #[test]
    fn rects_stack_vertically() {
        assert_eq!(tile_rect(0).unwrap(), TileRect { x: 0, y: 0, width: 32, height: 32 });
        assert_eq!(tile_rect(11).unwrap().y, 352);
        assert!(tile_rect(12).is_err());
    }
}
