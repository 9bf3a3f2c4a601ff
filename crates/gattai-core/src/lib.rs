//! Core engine for composite ("Gattai") Sudoku: several standard 9x9 grids
//! that physically share the cells of one or more 3x3 boxes.
//!
//! The crate owns the hard parts of playing such a puzzle: resolving which
//! cells are shared ([`overlap`]), keeping shared cells in lock-step through
//! every edit ([`board`]), flagging rule conflicts within and across grids
//! ([`conflict`]), replay-safe bounded undo ([`history`]), and the
//! play-through lifecycle with timer bookkeeping ([`session`]). Plain 9x9
//! puzzles run through the same engine as a single-grid layout.
//!
//! Fetching puzzle JSON, rendering, and persistence belong to the embedding
//! application; the boundary types live in [`puzzle`] and [`snapshot`].

pub mod board;
pub mod conflict;
pub mod error;
pub mod history;
pub mod marks;
pub mod mode;
pub mod overlap;
pub mod puzzle;
pub mod session;
pub mod snapshot;

pub use board::{CompositeBoard, GRID_SIZE};
pub use error::{PuzzleError, Rejection};
pub use history::{History, Move, MAX_HISTORY};
pub use marks::MarkSet;
pub use mode::{CellRef, GridId, Mode, ModeId, OverlapDecl};
pub use overlap::{OverlapMap, OverlapRole};
pub use puzzle::{parse_gattai, parse_standard, LoadedPuzzle, PuzzleGrid};
pub use session::{
    format_elapsed_ms, is_new_best, CellView, CheckReport, HintApplied, InputApplied,
    PuzzleSession, SessionState, VictoryInfo,
};
pub use snapshot::SessionSnapshot;
