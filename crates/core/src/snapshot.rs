//! Read-only view of a game for renderers and the headless runner

use std::fmt;

use serde::Serialize;

use crate::catalog::PieceCells;
use crate::game_state::GameState;
use crate::piece::Piece;
use crate::types::{Cell, Color, Phase, ShapeId, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieceSnapshot {
    pub shape: ShapeId,
    pub rotation: usize,
    pub x: i8,
    pub y: i8,
    pub color: Color,
    /// Absolute board cells; rows may be negative while entering
    pub cells: PieceCells,
}

impl PieceSnapshot {
    fn new(piece: Piece, cells: PieceCells) -> Self {
        Self {
            shape: piece.shape,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
            color: piece.color,
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Locked cells, `board[y][x]`
    pub board: [[Cell; WIDTH]; HEIGHT],
    pub current: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
    pub score: u32,
    pub fall_interval: f64,
    pub phase: Phase,
    pub terminal: bool,
    pub rows_cleared: u32,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let mut board = [[None; WIDTH]; HEIGHT];
        for (y, row) in state.board().rows().enumerate() {
            board[y].copy_from_slice(row);
        }

        Self {
            board,
            current: state
                .current()
                .zip(state.current_cells())
                .map(|(p, cells)| PieceSnapshot::new(p, cells)),
            next: state
                .next()
                .zip(state.next_cells())
                .map(|(p, cells)| PieceSnapshot::new(p, cells)),
            score: state.score(),
            fall_interval: state.fall_interval(),
            phase: state.phase(),
            terminal: state.is_terminal(),
            rows_cleared: state.rows_cleared(),
        }
    }

    /// Color shown at (x, y): the falling piece over the locked cells
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if let Some(current) = &self.current {
            if current.cells.contains(&(x as i8, y as i8)) {
                return Some(current.color);
            }
        }
        self.board.get(y).and_then(|row| row.get(x).copied()).flatten()
    }
}

fn glyph(color: Color, falling: bool) -> char {
    let letter = ShapeId::ALL
        .into_iter()
        .find(|s| s.color() == color)
        .map(|s| s.as_str().chars().next().unwrap_or('#'))
        .unwrap_or('#');
    if falling {
        letter.to_ascii_uppercase()
    } else {
        letter
    }
}

/// Plain-text board: locked cells in lowercase, the falling piece in uppercase
impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{}+", "-".repeat(WIDTH))?;
        for y in 0..HEIGHT {
            write!(f, "|")?;
            for x in 0..WIDTH {
                let falling = self
                    .current
                    .as_ref()
                    .is_some_and(|p| p.cells.contains(&(x as i8, y as i8)));
                let ch = match self.cell(x, y) {
                    Some(color) => glyph(color, falling),
                    None => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "+{}+", "-".repeat(WIDTH))?;
        write!(
            f,
            "score {}  rows {}  interval {:.2}s  {}",
            self.score,
            self.rows_cleared,
            self.fall_interval,
            self.phase.as_str()
        )?;
        if let Some(next) = &self.next {
            write!(f, "  next {}", next.shape.as_str().to_ascii_uppercase())?;
        }
        Ok(())
    }
}
