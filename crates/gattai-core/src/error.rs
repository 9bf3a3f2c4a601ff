use crate::mode::{GridId, ModeId};
use thiserror::Error;

/// Structural failures. Fatal to puzzle load: no board state exists after
/// one of these is returned.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("malformed puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("puzzle grids do not match mode {mode}: missing {missing:?}, unexpected {unexpected:?}")]
    ShapeMismatch {
        mode: ModeId,
        missing: Vec<GridId>,
        unexpected: Vec<GridId>,
    },

    #[error("{which} for grid {grid} must be a 9x9 array")]
    BadDimensions { grid: GridId, which: &'static str },

    #[error("{which} value {value} at {grid} r{row}c{col} is out of range")]
    CellOutOfRange {
        grid: GridId,
        which: &'static str,
        row: usize,
        col: usize,
        value: u8,
    },
}

/// Recoverable no-ops. The requested operation was rejected and the board is
/// unchanged; callers may surface these to the user or drop them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cell is a given clue")]
    GivenCellLocked,
    #[error("solution has been revealed")]
    RevealedStateImmutable,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("no empty cells remain")]
    NoEmptyCells,
    #[error("no cell is selected")]
    NoSelection,
}
