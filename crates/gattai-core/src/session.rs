//! One play-through of one puzzle. The session owns the board, the undo
//! log, selection and pencil state, timer bookkeeping, and the lifecycle
//! state machine; rendering and persistence stay outside.
//!
//! The engine never reads a clock: every time-dependent operation takes the
//! caller's `now_ms` (Unix epoch milliseconds), so sessions replay
//! deterministically under test.

use crate::board::CompositeBoard;
use crate::conflict;
use crate::error::{PuzzleError, Rejection};
use crate::history::{History, Move};
use crate::marks::MarkSet;
use crate::mode::{CellRef, GridId, Mode};
use crate::puzzle::LoadedPuzzle;
use crate::snapshot::SessionSnapshot;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Lifecycle state. `Revealed` is terminal until reset; `Completed` is
/// reached only by matching the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Ready,
    Editing,
    Completed,
    Revealed,
}

/// Per-cell render state for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub value: u8,
    pub marks: MarkSet,
    pub given: bool,
    pub conflict: bool,
    pub overlap: bool,
}

/// Reported when the board first matches the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryInfo {
    pub elapsed_ms: u64,
}

/// Result of an accepted edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputApplied {
    /// Physical cells whose render state changed.
    pub cells: Vec<CellRef>,
    pub victory: Option<VictoryInfo>,
}

/// Result of an accepted hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintApplied {
    pub cell: CellRef,
    pub value: u8,
    pub cells: Vec<CellRef>,
    pub victory: Option<VictoryInfo>,
}

/// Outcome of the check action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Cells whose value disagrees with the solution.
    pub wrong: Vec<CellRef>,
    /// How many cells are still empty.
    pub empty: usize,
    pub victory: Option<VictoryInfo>,
}

pub struct PuzzleSession {
    board: CompositeBoard,
    history: History,
    selected: Option<CellRef>,
    pencil_mode: bool,
    state: SessionState,
    /// Epoch ms when the running segment started; `None` while stopped.
    started_at: Option<u64>,
    /// Play time accumulated before the current running segment.
    accumulated_ms: u64,
    conflicts: HashSet<CellRef>,
    hints_used: usize,
}

impl PuzzleSession {
    /// Start a fresh session; the clock starts immediately.
    pub fn new(puzzle: &LoadedPuzzle, now_ms: u64) -> Result<Self, PuzzleError> {
        let board = CompositeBoard::new(puzzle.mode, &puzzle.grids)?;
        let conflicts = conflict::full_board_scan(&board);
        log::info!("session started: {}", board.mode().display_name);
        Ok(PuzzleSession {
            board,
            history: History::new(),
            selected: None,
            pencil_mode: false,
            state: SessionState::Ready,
            started_at: Some(now_ms),
            accumulated_ms: 0,
            conflicts,
            hints_used: 0,
        })
    }

    /// Rebuild a session from a snapshot plus the re-fetched puzzle. Given
    /// cells always take their value from the puzzle, not the snapshot.
    pub fn restore(puzzle: &LoadedPuzzle, snapshot: &SessionSnapshot) -> Result<Self, PuzzleError> {
        let mut board = CompositeBoard::new(puzzle.mode, &puzzle.grids)?;
        let mode = board.mode();
        let missing: Vec<GridId> = mode
            .grid_ids
            .iter()
            .copied()
            .filter(|g| !snapshot.current_grids.contains_key(g) || !snapshot.marks.contains_key(g))
            .collect();
        let unexpected: Vec<GridId> = snapshot
            .current_grids
            .keys()
            .chain(snapshot.marks.keys())
            .copied()
            .filter(|&g| !mode.declares(g))
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(PuzzleError::ShapeMismatch { mode: puzzle.mode, missing, unexpected });
        }
        for &grid in mode.grid_ids {
            let current = &snapshot.current_grids[&grid];
            for (row, cols) in current.iter().enumerate() {
                for (col, &value) in cols.iter().enumerate() {
                    if value > 9 {
                        return Err(PuzzleError::CellOutOfRange {
                            grid,
                            which: "currentGrids",
                            row,
                            col,
                            value,
                        });
                    }
                }
            }
            board.load_saved_grid(grid, current, &snapshot.marks[&grid]);
        }
        let state = if snapshot.revealed {
            SessionState::Revealed
        } else if snapshot.history.is_empty() {
            SessionState::Ready
        } else {
            SessionState::Editing
        };
        let conflicts = conflict::full_board_scan(&board);
        log::debug!(
            "session restored: {} ({} moves)",
            mode.display_name,
            snapshot.history.len()
        );
        Ok(PuzzleSession {
            board,
            history: History::from_moves(snapshot.history.clone()),
            selected: None,
            pencil_mode: false,
            state,
            started_at: snapshot.started_at,
            accumulated_ms: snapshot.accumulated_paused_ms,
            conflicts,
            hints_used: 0,
        })
    }

    /// Snapshot everything an external store needs to resume this session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let mut current_grids = BTreeMap::new();
        let mut marks = BTreeMap::new();
        for &grid in self.board.mode().grid_ids {
            current_grids.insert(grid, *self.board.current_grid(grid));
            marks.insert(grid, *self.board.marks_grid(grid));
        }
        SessionSnapshot {
            current_grids,
            marks,
            history: self.history.moves().copied().collect(),
            started_at: self.started_at,
            accumulated_paused_ms: self.accumulated_ms,
            revealed: self.state == SessionState::Revealed,
        }
    }

    pub fn board(&self) -> &CompositeBoard {
        &self.board
    }

    pub fn mode(&self) -> &'static Mode {
        self.board.mode()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selected(&self) -> Option<CellRef> {
        self.selected
    }

    pub fn pencil_mode(&self) -> bool {
        self.pencil_mode
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn undo_available(&self) -> bool {
        !self.history.is_empty() && self.state != SessionState::Revealed
    }

    /// Render state for one cell.
    pub fn cell_view(&self, cell: CellRef) -> CellView {
        CellView {
            value: self.board.value(cell),
            marks: self.board.marks(cell),
            given: self.board.is_given(cell),
            conflict: self.conflicts.contains(&cell),
            overlap: self.board.overlap().is_overlapping(cell),
        }
    }

    pub fn conflicts(&self) -> &HashSet<CellRef> {
        &self.conflicts
    }

    /// Select a cell, or clear the selection with `None`. Returns false and
    /// leaves the selection untouched for references outside the mode.
    pub fn select_cell(&mut self, cell: Option<CellRef>) -> bool {
        if let Some(c) = cell {
            if !self.board.mode().declares(c.grid) || c.row >= 9 || c.col >= 9 {
                return false;
            }
        }
        self.selected = cell;
        true
    }

    pub fn set_pencil_mode(&mut self, on: bool) {
        self.pencil_mode = on;
    }

    pub fn toggle_pencil_mode(&mut self) {
        self.pencil_mode = !self.pencil_mode;
    }

    /// Apply a digit 1-9 to the selected cell: a committed value normally,
    /// a pencil-mark toggle in pencil mode.
    pub fn enter_digit(&mut self, digit: u8, now_ms: u64) -> Result<InputApplied, Rejection> {
        debug_assert!((1..=9).contains(&digit));
        let cell = self.selected.ok_or(Rejection::NoSelection)?;
        self.guard_mutable()?;
        let prev_value = self.board.value(cell);
        let prev_marks = self.board.marks(cell);
        let cells = if self.pencil_mode {
            self.board.toggle_mark(cell, digit)?
        } else {
            self.board.set_value(cell, digit)?
        };
        self.push_move(cell, prev_value, prev_marks);
        self.after_mutation();
        let victory = if self.pencil_mode { None } else { self.check_victory(now_ms) };
        Ok(InputApplied { cells, victory })
    }

    /// Erase the selected cell's value and marks. An already-empty cell is
    /// a quiet no-op that records no history.
    pub fn erase(&mut self) -> Result<InputApplied, Rejection> {
        let cell = self.selected.ok_or(Rejection::NoSelection)?;
        self.guard_mutable()?;
        let prev_value = self.board.value(cell);
        let prev_marks = self.board.marks(cell);
        let cells = self.board.clear_cell(cell)?;
        if !cells.is_empty() {
            self.push_move(cell, prev_value, prev_marks);
            self.after_mutation();
        }
        Ok(InputApplied { cells, victory: None })
    }

    /// Undo the newest move. Rejected once the solution is revealed.
    pub fn undo(&mut self) -> Result<Move, Rejection> {
        self.guard_mutable()?;
        let undone = self.history.undo(&mut self.board)?;
        self.after_mutation();
        Ok(undone)
    }

    /// Fill one random empty cell from the solution. Every physically empty
    /// cell is eligible, so the two halves of a shared pair each hold a
    /// ticket; the draw fills both at once through the synced write path.
    pub fn hint<R: Rng>(&mut self, rng: &mut R, now_ms: u64) -> Result<HintApplied, Rejection> {
        self.guard_mutable()?;
        let empties: Vec<CellRef> = self
            .board
            .cells()
            .filter(|&c| !self.board.is_given(c) && self.board.value(c) == 0)
            .collect();
        if empties.is_empty() {
            return Err(Rejection::NoEmptyCells);
        }
        let cell = empties[rng.gen_range(0..empties.len())];
        let value = self.board.solution_value(cell);
        let prev_value = self.board.value(cell);
        let prev_marks = self.board.marks(cell);
        let cells = self.board.set_value(cell, value)?;
        self.push_move(cell, prev_value, prev_marks);
        self.selected = Some(cell);
        self.hints_used += 1;
        self.after_mutation();
        log::debug!("hint filled {cell}");
        let victory = self.check_victory(now_ms);
        Ok(HintApplied { cell, value, cells, victory })
    }

    /// Compare the board against the solution: wrong cells, empty count,
    /// and the victory transition when neither remains.
    pub fn check(&mut self, now_ms: u64) -> Result<CheckReport, Rejection> {
        self.guard_mutable()?;
        let mut wrong = Vec::new();
        let mut empty = 0;
        for cell in self.board.cells() {
            let value = self.board.value(cell);
            if value == 0 {
                empty += 1;
            } else if value != self.board.solution_value(cell) {
                wrong.push(cell);
            }
        }
        let victory = if wrong.is_empty() && empty == 0 {
            self.check_victory(now_ms)
        } else {
            None
        };
        Ok(CheckReport { wrong, empty, victory })
    }

    /// Fill the entire solution and freeze the session. Irreversible; the
    /// caller is responsible for having confirmed the action. Idempotent.
    pub fn reveal(&mut self, now_ms: u64) {
        if self.state == SessionState::Revealed {
            return;
        }
        self.board.reveal_all();
        self.stop_clock(now_ms);
        self.state = SessionState::Revealed;
        self.conflicts = conflict::full_board_scan(&self.board);
        log::info!("solution revealed");
    }

    /// Back to the authored puzzle: clues only, empty history, clock at
    /// zero. Clears the revealed flag.
    pub fn reset(&mut self, now_ms: u64) {
        self.board.reset_all();
        self.history.clear();
        self.selected = None;
        self.state = SessionState::Ready;
        self.started_at = Some(now_ms);
        self.accumulated_ms = 0;
        self.conflicts = conflict::full_board_scan(&self.board);
        log::info!("session reset");
    }

    /// Stop the clock. Redundant calls are no-ops; the visibility signal
    /// that typically drives this can fire repeatedly.
    pub fn pause(&mut self, now_ms: u64) {
        self.stop_clock(now_ms);
    }

    /// Restart the clock after a pause. No-op while already running, or
    /// once the session is completed or revealed.
    pub fn resume(&mut self, now_ms: u64) {
        if self.started_at.is_some() {
            return;
        }
        if matches!(self.state, SessionState::Completed | SessionState::Revealed) {
            return;
        }
        self.started_at = Some(now_ms);
    }

    /// Total play time: the accumulator plus the running segment.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.started_at {
            Some(started) => self.accumulated_ms + now_ms.saturating_sub(started),
            None => self.accumulated_ms,
        }
    }

    fn stop_clock(&mut self, now_ms: u64) {
        if let Some(started) = self.started_at.take() {
            self.accumulated_ms += now_ms.saturating_sub(started);
        }
    }

    fn guard_mutable(&self) -> Result<(), Rejection> {
        if self.state == SessionState::Revealed {
            return Err(Rejection::RevealedStateImmutable);
        }
        Ok(())
    }

    fn push_move(&mut self, cell: CellRef, prev_value: u8, prev_marks: MarkSet) {
        self.history.record(Move {
            grid_id: cell.grid,
            row: cell.row,
            col: cell.col,
            prev_value,
            prev_marks,
            new_value: self.board.value(cell),
            new_marks: self.board.marks(cell),
        });
    }

    fn after_mutation(&mut self) {
        if self.state == SessionState::Ready {
            self.state = SessionState::Editing;
        } else if self.state == SessionState::Completed && !self.board.is_solved() {
            self.state = SessionState::Editing;
        }
        self.conflicts = conflict::full_board_scan(&self.board);
    }

    fn check_victory(&mut self, now_ms: u64) -> Option<VictoryInfo> {
        if self.state == SessionState::Completed
            || self.state == SessionState::Revealed
            || !self.board.is_solved()
        {
            return None;
        }
        self.stop_clock(now_ms);
        self.state = SessionState::Completed;
        log::info!("puzzle completed in {}", format_elapsed_ms(self.accumulated_ms));
        Some(VictoryInfo { elapsed_ms: self.accumulated_ms })
    }
}

/// True when `elapsed` beats the stored best time (or there is none yet).
pub fn is_new_best(previous_best_ms: Option<u64>, elapsed_ms: u64) -> bool {
    previous_best_ms.map_or(true, |best| elapsed_ms < best)
}

/// Render elapsed time as `M:SS`, or `H:MM:SS` once over an hour.
pub fn format_elapsed_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
