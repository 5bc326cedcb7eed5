//! Headless minesweeper board drawn with the tile sheet.

use std::collections::VecDeque;

use log::{debug, info};
use rand::Rng;

use crate::tile::TileKind;
use crate::SheetError;

pub const BOARD_WIDTH: usize = 20;
pub const BOARD_HEIGHT: usize = 20;
/// Probability of any single cell holding a bomb.
pub const BOMB_CHANCE: f64 = 0.2;

const NEIGHBOURS: [(i64, i64); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_bomb: bool,
    pub opened: bool,
    pub flagged: bool,
}

/// Result of opening a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    /// Number of cells opened, including flood-filled neighbours.
    Opened(usize),
    /// The cell held a bomb; only that cell was opened.
    Exploded,
    AlreadyOpen,
    /// Flagged cells stay closed until the flag is removed.
    Flagged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Board where each cell is a bomb with probability `bomb_chance`.
    pub fn generate<R: Rng>(width: usize, height: usize, bomb_chance: f64, rng: &mut R) -> Self {
        let mut board = Self { width, height, cells: vec![Cell::default(); width * height] };
        board.restart(bomb_chance, rng);
        board
    }

    /// Board with bombs at exactly the given cells.
    pub fn with_bombs(
        width: usize,
        height: usize,
        bombs: &[(usize, usize)],
    ) -> Result<Self, SheetError> {
        let mut board = Self { width, height, cells: vec![Cell::default(); width * height] };
        for &(x, y) in bombs {
            let index = board.offset(x, y)?;
            board.cells[index].is_bomb = true;
        }
        Ok(board)
    }

    /// Close and unflag every cell and scatter new bombs.
    pub fn restart<R: Rng>(&mut self, bomb_chance: f64, rng: &mut R) {
        let bomb_chance = bomb_chance.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            *cell = Cell { is_bomb: rng.gen_bool(bomb_chance), ..Cell::default() };
        }
        info!("new {}x{} board with {} bombs", self.width, self.height, self.bomb_count());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bomb_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_bomb).count()
    }

    pub fn opened_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.opened).count()
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<Cell, SheetError> {
        Ok(self.cells[self.offset(x, y)?])
    }

    /// In-bounds cells around (`x`, `y`).
    pub fn neighbours(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            let inside =
                nx >= 0 && ny >= 0 && nx < self.width as i64 && ny < self.height as i64;
            inside.then_some((nx as usize, ny as usize))
        })
    }

    pub fn neighbour_bombs(&self, x: usize, y: usize) -> u8 {
        let bombs =
            self.neighbours(x, y).filter(|&(nx, ny)| self.cells[ny * self.width + nx].is_bomb);
        bombs.count() as u8
    }

    /// Tile shown for the cell at (`x`, `y`).
    pub fn tile(&self, x: usize, y: usize) -> Result<TileKind, SheetError> {
        let cell = self.cell(x, y)?;
        let kind = if cell.opened {
            if cell.is_bomb {
                TileKind::Bomb
            } else {
                TileKind::for_neighbours(self.neighbour_bombs(x, y)).unwrap_or(TileKind::Unknown)
            }
        } else if cell.flagged {
            TileKind::Flag
        } else {
            TileKind::Unknown
        };
        Ok(kind)
    }

    /// Open a cell, flooding outward through cells without neighbouring bombs.
    pub fn reveal(&mut self, x: usize, y: usize) -> Result<Reveal, SheetError> {
        let start = self.offset(x, y)?;
        let cell = self.cells[start];
        if cell.opened {
            return Ok(Reveal::AlreadyOpen);
        }
        if cell.flagged {
            return Ok(Reveal::Flagged);
        }
        if cell.is_bomb {
            self.cells[start].opened = true;
            info!("bomb opened at ({x}, {y})");
            return Ok(Reveal::Exploded);
        }

        let mut queued = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([(x, y)]);
        queued[start] = true;
        let mut opened = 0;

        while let Some((cx, cy)) = queue.pop_front() {
            self.cells[cy * self.width + cx].opened = true;
            opened += 1;

            if self.neighbour_bombs(cx, cy) != 0 {
                continue;
            }

            let next: Vec<(usize, usize)> = self
                .neighbours(cx, cy)
                .filter(|&(nx, ny)| {
                    let neighbour = self.cells[ny * self.width + nx];
                    !neighbour.is_bomb && !neighbour.opened && !neighbour.flagged
                })
                .collect();
            for (nx, ny) in next {
                let index = ny * self.width + nx;
                if !queued[index] {
                    queued[index] = true;
                    queue.push_back((nx, ny));
                }
            }
        }

        debug!("opened {opened} cells from ({x}, {y})");
        Ok(Reveal::Opened(opened))
    }

    /// Toggle the flag on a closed cell. Returns the new flag state, `None` if already open.
    pub fn toggle_flag(&mut self, x: usize, y: usize) -> Result<Option<bool>, SheetError> {
        let index = self.offset(x, y)?;
        let cell = &mut self.cells[index];
        if cell.opened {
            return Ok(None);
        }
        cell.flagged = !cell.flagged;
        Ok(Some(cell.flagged))
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, SheetError> {
        if x >= self.width || y >= self.height {
            return Err(SheetError::CellOutOfBounds { x, y });
        }
        Ok(y * self.width + x)
    }
}
