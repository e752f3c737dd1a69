//! Board module - the 10x20 grid of locked cells
//!
//! The board stores only settled cells. A flat row-major array is the single
//! source of truth, so the grid view and the set of locked cells can never
//! disagree: a cell is non-empty exactly when it is locked.
//!
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom). Rows above the top (y < 0) are never stored and never
//! blocked.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::error::{EngineError, Result};
use crate::types::{Cell, Color, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Outcome of a successful [`Board::lock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockReport {
    /// Cells written to the board
    pub stored: u8,
    /// Cells that were still above the top row and could not be stored
    pub above_top: u8,
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Build a board from explicit locked cells
    pub fn from_locked(locked: impl IntoIterator<Item = ((i8, i8), Color)>) -> Result<Self> {
        let mut board = Self::new();
        for ((x, y), color) in locked {
            board.lock(&[(x, y)], color)?;
        }
        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True if (x, y) holds a locked cell. Rows above the top are never blocked.
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        if y < 0 {
            return false;
        }
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// True if (x, y) is inside the board and not locked
    pub fn is_empty(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Lock cells with the given color
    ///
    /// Cells above the top row are counted in the report but not stored.
    /// Any other cell must be inside the board and currently empty; otherwise
    /// nothing is written and the violation is returned.
    pub fn lock(&mut self, cells: &[(i8, i8)], color: Color) -> Result<LockReport> {
        let mut report = LockReport::default();

        for &(x, y) in cells {
            if y < 0 {
                continue;
            }
            match self.get(x, y) {
                None => return Err(EngineError::OutOfBounds { x, y }),
                Some(Some(_)) => return Err(EngineError::ConsistencyViolation { x, y }),
                Some(None) => {}
            }
        }

        for &(x, y) in cells {
            if y < 0 {
                report.above_top += 1;
            } else {
                self.set(x, y, Some(color));
                report.stored += 1;
            }
        }

        Ok(report)
    }

    /// Clear every full row and return how many were cleared
    ///
    /// Rows are scanned bottom to top. After the full rows are emptied, every
    /// locked cell above the topmost cleared row moves down by the number of
    /// cleared rows, processed in descending row order so a moved cell never
    /// lands on one that has yet to move. Cells between cleared rows stay put.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut full_rows: ArrayVec<usize, HEIGHT> = ArrayVec::new();
        for y in (0..HEIGHT).rev() {
            if self.is_row_full(y) {
                full_rows.push(y);
            }
        }

        let cleared = full_rows.len();
        let Some(&topmost) = full_rows.last() else {
            return 0;
        };

        for &y in &full_rows {
            let start = y * WIDTH;
            for cell in &mut self.cells[start..start + WIDTH] {
                *cell = None;
            }
        }

        for y in (0..topmost).rev() {
            for x in 0..WIDTH {
                if let Some(color) = self.cells[y * WIDTH + x].take() {
                    self.cells[(y + cleared) * WIDTH + x] = Some(color);
                }
            }
        }

        cleared
    }

    /// Locked cells as ((x, y), color), row-major
    pub fn locked_cells(&self) -> impl Iterator<Item = ((i8, i8), Color)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.map(|color| (((idx % WIDTH) as i8, (idx / WIDTH) as i8), color))
        })
    }

    /// Locked cells collected into a coordinate map
    pub fn locked_map(&self) -> BTreeMap<(i8, i8), Color> {
        self.locked_cells().collect()
    }

    pub fn locked_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Smallest row index holding a locked cell
    pub fn top_locked_row(&self) -> Option<i8> {
        self.cells
            .iter()
            .position(|cell| cell.is_some())
            .map(|idx| (idx / WIDTH) as i8)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows of the grid view, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(WIDTH)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
