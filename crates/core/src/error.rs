//! Error types for catalog construction, configuration, and board consistency.
//!
//! Rejected moves are not errors; they show up as `false` from the command API.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ShapeId;

/// A malformed shape catalog entry. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("shape {shape:?} rotation {rotation}: mask has {rows} rows, expected {expected}")]
    MaskHeight {
        shape: ShapeId,
        rotation: usize,
        rows: usize,
        expected: usize,
    },

    #[error("shape {shape:?} rotation {rotation}: row {row} has {len} columns, expected {expected}")]
    MaskWidth {
        shape: ShapeId,
        rotation: usize,
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("shape {shape:?} rotation {rotation}: unexpected glyph {glyph:?}")]
    Glyph {
        shape: ShapeId,
        rotation: usize,
        glyph: char,
    },

    #[error("shape {shape:?} rotation {rotation}: {found} occupied cells, expected {expected}")]
    CellCount {
        shape: ShapeId,
        rotation: usize,
        found: usize,
        expected: usize,
    },

    #[error("shape {shape:?}: {found} rotation states, expected {expected}")]
    RotationCount {
        shape: ShapeId,
        found: usize,
        expected: usize,
    },

    #[error("shape {0:?} is defined more than once")]
    Duplicate(ShapeId),

    #[error("shape {0:?} is missing from the catalog")]
    Missing(ShapeId),
}

/// Invalid engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A board lock that would break the locked-cell invariants
#[derive(Debug, Error)]
pub enum EngineError {
    /// A lock tried to overwrite an already-locked cell
    #[error("consistency violation: cell ({x}, {y}) is already locked")]
    ConsistencyViolation { x: i8, y: i8 },

    /// A lock tried to store a cell outside the board
    #[error("consistency violation: cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i8, y: i8 },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
