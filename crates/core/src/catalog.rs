//! Shape catalog - the seven tetrominoes and their rotation masks
//!
//! Each rotation state is a 5x5 text mask where `0` marks an occupied cell
//! and `.` an empty one. Masks are parsed and validated once when the catalog
//! is built; afterwards the catalog is read-only.
//!
//! Occupied mask cells are turned into offsets relative to the piece anchor by
//! subtracting the mask origin `(2, 4)`, so a mask cell at column `j`, row `i`
//! lands on board cell `(anchor_x + j - 2, anchor_y + i - 4)`.

use std::sync::{Arc, OnceLock};

use arrayvec::ArrayVec;

use crate::error::CatalogError;
use crate::rng::SimpleRng;
use crate::types::{ShapeId, CELLS_PER_PIECE, MASK_ORIGIN_X, MASK_ORIGIN_Y, MASK_SIZE};

/// Offset of a single cell relative to the piece anchor
pub type CellOffset = (i8, i8);

/// Occupied offsets of one rotation state
pub type PieceCells = [CellOffset; CELLS_PER_PIECE];

/// One parsed rotation mask, indexed `[row][column]`
pub type Mask = [[bool; MASK_SIZE]; MASK_SIZE];

/// Most rotation states any shape may define
pub const MAX_ROTATIONS: usize = 4;

const S_MASKS: &[&[&str]] = &[
    &[".....", ".....", "..00.", ".00..", "....."],
    &[".....", "..0..", "..00.", "...0.", "....."],
];

const Z_MASKS: &[&[&str]] = &[
    &[".....", ".....", ".00..", "..00.", "....."],
    &[".....", "..0..", ".00..", ".0...", "....."],
];

const I_MASKS: &[&[&str]] = &[
    &["..0..", "..0..", "..0..", "..0..", "....."],
    &[".....", "0000.", ".....", ".....", "....."],
];

const O_MASKS: &[&[&str]] = &[&[".....", ".....", ".00..", ".00..", "....."]];

const T_MASKS: &[&[&str]] = &[
    &[".....", "..0..", ".000.", ".....", "....."],
    &[".....", "..0..", "..00.", "..0..", "....."],
    &[".....", ".....", ".000.", "..0..", "....."],
    &[".....", "..0..", ".00..", "..0..", "....."],
];

const J_MASKS: &[&[&str]] = &[
    &[".....", ".0...", ".000.", ".....", "....."],
    &[".....", "..00.", "..0..", "..0..", "....."],
    &[".....", ".....", ".000.", "...0.", "....."],
    &[".....", "..0..", "..0..", ".00..", "....."],
];

const L_MASKS: &[&[&str]] = &[
    &[".....", "...0.", ".000.", ".....", "....."],
    &[".....", "..0..", "..0..", "..00.", "....."],
    &[".....", ".....", ".000.", ".0...", "....."],
    &[".....", ".00..", "..0..", "..0..", "....."],
];

/// Built-in masks for a shape
pub fn standard_masks(id: ShapeId) -> &'static [&'static [&'static str]] {
    match id {
        ShapeId::S => S_MASKS,
        ShapeId::Z => Z_MASKS,
        ShapeId::I => I_MASKS,
        ShapeId::O => O_MASKS,
        ShapeId::T => T_MASKS,
        ShapeId::J => J_MASKS,
        ShapeId::L => L_MASKS,
    }
}

/// A shape and its ordered rotation states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDefinition {
    id: ShapeId,
    cells: ArrayVec<PieceCells, MAX_ROTATIONS>,
}

impl ShapeDefinition {
    /// Parse and validate the text masks of one shape
    pub fn parse(id: ShapeId, states: &[&[&str]]) -> Result<Self, CatalogError> {
        let expected = id.rotation_count();
        if states.len() != expected {
            return Err(CatalogError::RotationCount {
                shape: id,
                found: states.len(),
                expected,
            });
        }

        let mut cells = ArrayVec::new();
        for (rotation, rows) in states.iter().enumerate() {
            let mask = parse_mask(id, rotation, rows)?;
            cells.push(mask_cells(id, rotation, &mask)?);
        }

        Ok(Self { id, cells })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn rotation_count(&self) -> usize {
        self.cells.len()
    }

    /// Anchor-relative offsets of a rotation state (index taken modulo the state count)
    pub fn cells(&self, rotation: usize) -> PieceCells {
        self.cells[rotation % self.cells.len()]
    }
}

fn parse_mask(id: ShapeId, rotation: usize, rows: &[&str]) -> Result<Mask, CatalogError> {
    if rows.len() != MASK_SIZE {
        return Err(CatalogError::MaskHeight {
            shape: id,
            rotation,
            rows: rows.len(),
            expected: MASK_SIZE,
        });
    }

    let mut mask = [[false; MASK_SIZE]; MASK_SIZE];
    for (row, line) in rows.iter().enumerate() {
        let len = line.chars().count();
        if len != MASK_SIZE {
            return Err(CatalogError::MaskWidth {
                shape: id,
                rotation,
                row,
                len,
                expected: MASK_SIZE,
            });
        }
        for (col, glyph) in line.chars().enumerate() {
            mask[row][col] = match glyph {
                '0' => true,
                '.' => false,
                other => {
                    return Err(CatalogError::Glyph {
                        shape: id,
                        rotation,
                        glyph: other,
                    })
                }
            };
        }
    }
    Ok(mask)
}

fn mask_cells(id: ShapeId, rotation: usize, mask: &Mask) -> Result<PieceCells, CatalogError> {
    let mut cells: ArrayVec<CellOffset, { MASK_SIZE * MASK_SIZE }> = ArrayVec::new();
    for (row, line) in mask.iter().enumerate() {
        for (col, &occupied) in line.iter().enumerate() {
            if occupied {
                cells.push((col as i8 - MASK_ORIGIN_X, row as i8 - MASK_ORIGIN_Y));
            }
        }
    }

    let found = cells.len();
    cells
        .as_slice()
        .try_into()
        .map_err(|_| CatalogError::CellCount {
            shape: id,
            rotation,
            found,
            expected: CELLS_PER_PIECE,
        })
}

/// The full set of shapes, indexed by [`ShapeId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeCatalog {
    shapes: Vec<ShapeDefinition>,
}

impl ShapeCatalog {
    /// Assemble a catalog; every shape id must appear exactly once
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ShapeDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut slots: [Option<ShapeDefinition>; 7] = Default::default();
        for def in definitions {
            let slot = &mut slots[def.id().index()];
            if slot.is_some() {
                return Err(CatalogError::Duplicate(def.id()));
            }
            *slot = Some(def);
        }

        let mut shapes = Vec::with_capacity(ShapeId::ALL.len());
        for (id, slot) in ShapeId::ALL.into_iter().zip(slots) {
            shapes.push(slot.ok_or(CatalogError::Missing(id))?);
        }
        Ok(Self { shapes })
    }

    /// Parse the built-in masks
    pub fn try_standard() -> Result<Self, CatalogError> {
        let defs = ShapeId::ALL
            .into_iter()
            .map(|id| ShapeDefinition::parse(id, standard_masks(id)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_definitions(defs)
    }

    /// Shared instance of the built-in catalog
    ///
    /// # Panics
    ///
    /// Panics if the built-in masks fail validation. Call [`Self::try_standard`]
    /// at startup to surface that as an error instead.
    pub fn standard() -> Arc<ShapeCatalog> {
        static STANDARD: OnceLock<Arc<ShapeCatalog>> = OnceLock::new();
        STANDARD
            .get_or_init(|| match Self::try_standard() {
                Ok(catalog) => Arc::new(catalog),
                Err(err) => {
                    tracing::error!(error = %err, "built-in shape catalog is malformed");
                    panic!("built-in shape catalog is malformed: {err}");
                }
            })
            .clone()
    }

    pub fn shape(&self, id: ShapeId) -> &ShapeDefinition {
        &self.shapes[id.index()]
    }

    /// Occupied offsets of `id` at `rotation` (taken modulo the state count)
    pub fn cells_for(&self, id: ShapeId, rotation: usize) -> PieceCells {
        self.shape(id).cells(rotation)
    }

    pub fn rotation_count(&self, id: ShapeId) -> usize {
        self.shape(id).rotation_count()
    }

    /// Uniform choice over the seven shapes
    pub fn random_shape(&self, rng: &mut SimpleRng) -> ShapeId {
        let index = rng.next_range(self.shapes.len() as u32) as usize;
        self.shapes[index].id()
    }
}
