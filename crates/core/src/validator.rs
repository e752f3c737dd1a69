//! Placement rules for a piece on a board
//!
//! A cell is acceptable when it is one of the board's empty cells (inside the
//! 10x20 grid and not locked). Cells above the top row (y < 0) are accepted
//! without that check, which lets pieces enter the board from above. Board
//! bounds are enforced only through that membership test.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::catalog::ShapeCatalog;
use crate::piece::Piece;
use crate::types::BOARD_WIDTH;

/// Column policy for cells above the top row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnColumns {
    /// Any column is accepted above the top, even outside the board
    #[default]
    Permissive,
    /// Above the top, columns must still be within 0..BOARD_WIDTH
    Bounded,
}

/// True if every cell of `piece` is an acceptable placement on `board`
pub fn is_valid(
    piece: &Piece,
    board: &Board,
    catalog: &ShapeCatalog,
    spawn_columns: SpawnColumns,
) -> bool {
    piece
        .cells(catalog)
        .iter()
        .all(|&(x, y)| cell_accepted(board, x, y, spawn_columns))
}

fn cell_accepted(board: &Board, x: i8, y: i8, spawn_columns: SpawnColumns) -> bool {
    if y > -1 {
        return board.is_empty(x, y);
    }
    match spawn_columns {
        SpawnColumns::Permissive => true,
        SpawnColumns::Bounded => (0..BOARD_WIDTH as i8).contains(&x),
    }
}
