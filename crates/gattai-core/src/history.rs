//! Bounded undo log of cell-level edits.

use crate::board::CompositeBoard;
use crate::error::Rejection;
use crate::marks::MarkSet;
use crate::mode::{CellRef, GridId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Moves kept before the oldest is dropped.
pub const MAX_HISTORY: usize = 50;

/// One user-facing edit at one physical cell. The synchronized partner cell
/// is not recorded; replay recomputes it through the board's write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub grid_id: GridId,
    pub row: usize,
    pub col: usize,
    pub prev_value: u8,
    pub prev_marks: MarkSet,
    pub new_value: u8,
    pub new_marks: MarkSet,
}

impl Move {
    pub fn cell(&self) -> CellRef {
        CellRef::new(self.grid_id, self.row, self.col)
    }
}

/// FIFO-bounded undo stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    moves: VecDeque<Move>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted moves, re-applying the capacity bound.
    pub fn from_moves(moves: Vec<Move>) -> Self {
        let mut history = History::new();
        for m in moves {
            history.record(m);
        }
        history
    }

    /// Append an edit, evicting the oldest once over capacity.
    pub fn record(&mut self, m: Move) {
        self.moves.push_back(m);
        if self.moves.len() > MAX_HISTORY {
            self.moves.pop_front();
        }
    }

    /// Pop the newest move and restore its previous state through the same
    /// synchronized write path used for edits.
    pub fn undo(&mut self, board: &mut CompositeBoard) -> Result<Move, Rejection> {
        let m = self.moves.pop_back().ok_or(Rejection::NothingToUndo)?;
        board.restore(m.cell(), m.prev_value, m.prev_marks);
        Ok(m)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Oldest first, for persistence.
    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.moves.iter()
    }
}
