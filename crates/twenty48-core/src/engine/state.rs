use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::ops;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, handy for exhaustive checks.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// N x N grid of tile values in row-major order.
///
/// A cell holds `0` when empty, otherwise a power of two. The grid size is
/// fixed at construction and never changes for the lifetime of the board.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

impl Board {
    /// Construct an all-empty `size` x `size` board.
    pub fn empty(size: usize) -> Self {
        assert!(size >= 2, "board size must be at least 2");
        Board {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a board from explicit rows. Rows must form a square grid.
    ///
    /// Mostly useful for tests and for rehydrating persisted state.
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let size = rows.len();
        assert!(size >= 2, "board size must be at least 2");
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            assert_eq!(row.len(), size, "rows must form a square grid");
            cells.extend_from_slice(row);
        }
        Board { size, cells }
    }

    /// Side length of the grid.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `(row, col)`; `0` means empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.size + col] = value;
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Borrow row `row` as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [u32] {
        &mut self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Copy the grid out as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.size).map(|r| self.row(r).to_vec()).collect()
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize {
        ops::count_empty(self)
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empties = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.get(row, col) == 0 {
                    empties.push((row, col));
                }
            }
        }
        empties
    }

    /// Highest tile value present, or `0` on an empty board.
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Return true if no legal move remains: the board is full and no two
    /// orthogonally adjacent cells hold equal values.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }

    /// Return true if any cell has reached the winning tile.
    #[inline]
    pub fn is_win(&self) -> bool {
        ops::is_win(self)
    }

    /// Place a random tile (2 with 90% probability, 4 otherwise) on a
    /// uniformly chosen empty cell, returning its position.
    ///
    /// The cell draw and the value draw are independent. Fails with
    /// [`GameError::BoardFull`] when no empty cell exists; callers are
    /// expected to check occupancy first.
    pub fn spawn_random_tile<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(usize, usize), GameError> {
        let empties = self.empty_cells();
        if empties.is_empty() {
            return Err(GameError::BoardFull);
        }
        let (row, col) = empties[rng.gen_range(0..empties.len())];
        let value = if rng.gen_range(0..10) < 9 { 2 } else { 4 };
        self.set(row, col, value);
        Ok((row, col))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({}x{}, {:?})", self.size, self.size, self.cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(8 * self.size);
        for row in 0..self.size {
            if row > 0 {
                writeln!(f, "{}", rule)?;
            }
            let line: Vec<String> = self.row(row).iter().map(format_val).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: &u32) -> String {
    match val {
        0 => String::from("       "),
        &x => format!("{:^7}", x),
    }
}

/// Transient per-move record of which cells merged, row-major.
///
/// Purely a presentation cue (merge pop animations); it never influences
/// subsequent engine logic and is cleared at the start of every move.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeMask {
    size: usize,
    cells: Vec<bool>,
}

impl MergeMask {
    pub fn new(size: usize) -> Self {
        MergeMask {
            size,
            cells: vec![false; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the tile resting at `(row, col)` was produced by a merge
    /// during the last move.
    #[inline]
    pub fn merged(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, merged: bool) {
        self.cells[row * self.size + col] = merged;
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [bool] {
        &mut self.cells[row * self.size..(row + 1) * self.size]
    }

    /// True if no cell is flagged.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|&m| !m)
    }

    /// Reset every flag.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Coordinates of every flagged cell, row-major.
    pub fn merged_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.merged(row, col) {
                    out.push((row, col));
                }
            }
        }
        out
    }
}

impl fmt::Debug for MergeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MergeMask({:?})", self.merged_cells())
    }
}
