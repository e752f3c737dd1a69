//! The active falling piece and its pure transforms
//!
//! Transforms return a new [`Piece`]; the caller validates the candidate and
//! keeps the old value when it is rejected. Rotation never searches for an
//! alternative offset.
//!
//! Above the top row any column is a valid placement, so a piece can be pushed
//! sideways indefinitely before it enters the board. The anchor is confined to
//! `-ANCHOR_LIMIT..=ANCHOR_LIMIT` on both axes so its cells always fit in `i8`;
//! a move past that range yields no candidate.

use crate::board::Board;
use crate::catalog::{PieceCells, ShapeCatalog};
use crate::types::{Color, ShapeId, MASK_SIZE, SPAWN_ANCHOR};
use crate::validator::{is_valid, SpawnColumns};

/// Farthest the anchor may sit from the origin on either axis
pub const ANCHOR_LIMIT: i8 = i8::MAX - MASK_SIZE as i8;

fn within_limit(coord: i8) -> bool {
    (-ANCHOR_LIMIT..=ANCHOR_LIMIT).contains(&coord)
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: ShapeId,
    pub rotation: usize,
    pub x: i8,
    pub y: i8,
    pub color: Color,
}

impl Piece {
    /// Create a new piece at the spawn anchor
    pub fn spawn(shape: ShapeId) -> Self {
        Self {
            shape,
            rotation: 0,
            x: SPAWN_ANCHOR.0,
            y: SPAWN_ANCHOR.1,
            color: shape.color(),
        }
    }

    /// Absolute board cells occupied by this piece
    pub fn cells(&self, catalog: &ShapeCatalog) -> PieceCells {
        catalog
            .cells_for(self.shape, self.rotation)
            .map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Piece shifted by (dx, dy), or `None` if the anchor would leave its range
    pub fn moved(&self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x.checked_add(dx).filter(|&x| within_limit(x))?;
        let y = self.y.checked_add(dy).filter(|&y| within_limit(y))?;
        Some(Self { x, y, ..*self })
    }

    /// Piece advanced `direction` rotation states, wrapping at the state count
    pub fn rotated(&self, catalog: &ShapeCatalog, direction: i8) -> Self {
        let count = catalog.rotation_count(self.shape) as i64;
        let rotation = (self.rotation as i64 + direction as i64).rem_euclid(count) as usize;
        Self { rotation, ..*self }
    }

    /// Lowest position reachable by repeated one-row descents
    ///
    /// Does not lock. If the piece itself is not valid it is returned unchanged.
    pub fn hard_drop_target(
        &self,
        board: &Board,
        catalog: &ShapeCatalog,
        spawn_columns: SpawnColumns,
    ) -> Self {
        let mut target = *self;
        while let Some(next) = target
            .moved(0, 1)
            .filter(|next| is_valid(next, board, catalog, spawn_columns))
        {
            target = next;
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_uses_anchor_and_shape_color() {
        let piece = Piece::spawn(ShapeId::T);
        assert_eq!((piece.x, piece.y), (5, 0));
        assert_eq!(piece.rotation, 0);
        assert_eq!(piece.color, Color::MAGENTA);
    }

    #[test]
    fn test_rotation_wraps_both_ways() {
        let catalog = ShapeCatalog::standard();
        let piece = Piece::spawn(ShapeId::S);
        assert_eq!(piece.rotated(&catalog, 1).rotation, 1);
        assert_eq!(piece.rotated(&catalog, 1).rotated(&catalog, 1).rotation, 0);
        assert_eq!(piece.rotated(&catalog, -1).rotation, 1);

        let square = Piece::spawn(ShapeId::O);
        assert_eq!(square.rotated(&catalog, 1), square);
    }

    #[test]
    fn test_cells_follow_anchor() {
        let catalog = ShapeCatalog::standard();
        let piece = Piece::spawn(ShapeId::I).moved(-2, 10).unwrap();
        assert_eq!(piece.cells(&catalog), [(3, 6), (3, 7), (3, 8), (3, 9)]);
    }

    #[test]
    fn test_move_stops_at_anchor_limit() {
        let mut piece = Piece::spawn(ShapeId::L);
        let mut moves = 0;
        while let Some(next) = piece.moved(-1, 0) {
            piece = next;
            moves += 1;
        }
        assert_eq!(piece.x, -ANCHOR_LIMIT);
        assert_eq!(moves, 5 + ANCHOR_LIMIT as i32);
        assert_eq!(piece.moved(-100, 0), None);
        assert!(piece.moved(1, 0).is_some());

        // Cells of a piece at the limit still fit.
        let catalog = ShapeCatalog::standard();
        assert!(piece.cells(&catalog).iter().all(|&(x, _)| x < 0));
        let far = Piece { x: ANCHOR_LIMIT, y: ANCHOR_LIMIT, ..piece };
        assert_eq!(far.moved(1, 0), None);
        assert_eq!(far.moved(0, 1), None);
        assert!(far.cells(&catalog).iter().all(|&(x, y)| x > 0 && y > 0));
    }

    #[test]
    fn test_hard_drop_target_reaches_floor() {
        let catalog = ShapeCatalog::standard();
        let board = Board::new();
        let target = Piece::spawn(ShapeId::O).hard_drop_target(&board, &catalog, SpawnColumns::Permissive);
        assert_eq!(target.y, 20);
        let mut rows: Vec<i8> = target.cells(&catalog).iter().map(|&(_, y)| y).collect();
        rows.sort();
        rows.dedup();
        assert_eq!(rows, vec![18, 19]);
    }
}
