//! The composite board: per-grid values and pencil marks, with every
//! mutation synchronized across shared cells.

use crate::error::{PuzzleError, Rejection};
use crate::marks::MarkSet;
use crate::mode::{CellRef, GridId, Mode, ModeId};
use crate::overlap::OverlapMap;
use crate::puzzle::PuzzleGrid;
use std::collections::BTreeMap;

pub const GRID_SIZE: usize = 9;

/// One 9x9 grid's state. Given cells never change after load.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GridState {
    given: [[u8; 9]; 9],
    solution: [[u8; 9]; 9],
    current: [[u8; 9]; 9],
    marks: [[MarkSet; 9]; 9],
}

impl GridState {
    fn new(data: &PuzzleGrid) -> Self {
        GridState {
            given: data.given,
            solution: data.solution,
            current: data.given,
            marks: [[MarkSet::empty(); 9]; 9],
        }
    }
}

/// All grids of one puzzle plus the memoized overlap map.
///
/// Mutations run to completion synchronously; after any of them returns,
/// every shared pair holds identical values and marks.
#[derive(Debug, Clone)]
pub struct CompositeBoard {
    mode: &'static Mode,
    overlap: OverlapMap,
    grids: BTreeMap<GridId, GridState>,
}

impl PartialEq for CompositeBoard {
    fn eq(&self, other: &Self) -> bool {
        self.mode.id == other.mode.id && self.grids == other.grids
    }
}

impl CompositeBoard {
    /// Build a fresh board: `current := given`, no marks. The grid set must
    /// be exactly what the mode declares.
    pub fn new(
        mode_id: ModeId,
        grids: &BTreeMap<GridId, PuzzleGrid>,
    ) -> Result<Self, PuzzleError> {
        let mode = Mode::get(mode_id);
        let missing: Vec<GridId> = mode
            .grid_ids
            .iter()
            .copied()
            .filter(|g| !grids.contains_key(g))
            .collect();
        let unexpected: Vec<GridId> = grids
            .keys()
            .copied()
            .filter(|&g| !mode.declares(g))
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(PuzzleError::ShapeMismatch { mode: mode_id, missing, unexpected });
        }
        let states = grids
            .iter()
            .map(|(&id, data)| (id, GridState::new(data)))
            .collect();
        Ok(CompositeBoard {
            mode,
            overlap: OverlapMap::for_mode(mode),
            grids: states,
        })
    }

    pub fn mode(&self) -> &'static Mode {
        self.mode
    }

    pub fn overlap(&self) -> &OverlapMap {
        &self.overlap
    }

    fn grid(&self, id: GridId) -> &GridState {
        &self.grids[&id]
    }

    fn grid_mut(&mut self, id: GridId) -> &mut GridState {
        self.grids.get_mut(&id).expect("grid not declared by this mode")
    }

    pub fn value(&self, cell: CellRef) -> u8 {
        self.grid(cell.grid).current[cell.row][cell.col]
    }

    pub fn given_value(&self, cell: CellRef) -> u8 {
        self.grid(cell.grid).given[cell.row][cell.col]
    }

    pub fn is_given(&self, cell: CellRef) -> bool {
        self.given_value(cell) != 0
    }

    pub fn solution_value(&self, cell: CellRef) -> u8 {
        self.grid(cell.grid).solution[cell.row][cell.col]
    }

    pub fn marks(&self, cell: CellRef) -> MarkSet {
        self.grid(cell.grid).marks[cell.row][cell.col]
    }

    /// Current values of one grid, row-major.
    pub fn current_grid(&self, id: GridId) -> &[[u8; 9]; 9] {
        &self.grid(id).current
    }

    pub fn marks_grid(&self, id: GridId) -> &[[MarkSet; 9]; 9] {
        &self.grid(id).marks
    }

    /// Every physical cell of every grid, in draw order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.mode.grid_ids.iter().flat_map(|&grid| {
            (0..GRID_SIZE)
                .flat_map(move |row| (0..GRID_SIZE).map(move |col| CellRef::new(grid, row, col)))
        })
    }

    /// Write value and marks to a cell and, when the cell is shared, to its
    /// partner. Do, undo, and both overlap roles all funnel through here so
    /// they synchronize identically. Returns the physically written cells.
    fn write_cell(&mut self, cell: CellRef, value: u8, marks: MarkSet) -> Vec<CellRef> {
        let mut affected = vec![cell];
        if let Some(partner) = self.overlap.partner(cell) {
            affected.push(partner);
        }
        for &c in &affected {
            let grid = self.grid_mut(c.grid);
            grid.current[c.row][c.col] = value;
            grid.marks[c.row][c.col] = marks;
        }
        affected
    }

    /// Set a cell's value (0 clears it) and drop its pencil marks.
    pub fn set_value(&mut self, cell: CellRef, value: u8) -> Result<Vec<CellRef>, Rejection> {
        debug_assert!(value <= 9);
        if self.is_given(cell) {
            return Err(Rejection::GivenCellLocked);
        }
        Ok(self.write_cell(cell, value, MarkSet::empty()))
    }

    /// Flip one candidate digit. The partner cell receives a copy of the
    /// whole resulting set: marks are one logical note replicated to both
    /// drawings, not two independent sets.
    pub fn toggle_mark(&mut self, cell: CellRef, digit: u8) -> Result<Vec<CellRef>, Rejection> {
        debug_assert!((1..=9).contains(&digit));
        if self.is_given(cell) {
            return Err(Rejection::GivenCellLocked);
        }
        let value = self.value(cell);
        let marks = self.marks(cell).toggled(digit);
        Ok(self.write_cell(cell, value, marks))
    }

    /// Clear value and marks. Returns an empty list when the cell was
    /// already empty so callers can skip the history entry.
    pub fn clear_cell(&mut self, cell: CellRef) -> Result<Vec<CellRef>, Rejection> {
        if self.is_given(cell) {
            return Err(Rejection::GivenCellLocked);
        }
        if self.value(cell) == 0 && self.marks(cell).is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.write_cell(cell, 0, MarkSet::empty()))
    }

    /// Put a cell back to a recorded state; the undo path.
    pub(crate) fn restore(&mut self, cell: CellRef, value: u8, marks: MarkSet) -> Vec<CellRef> {
        self.write_cell(cell, value, marks)
    }

    /// Overlay persisted state onto one grid. Given cells keep their clue.
    pub(crate) fn load_saved_grid(
        &mut self,
        id: GridId,
        current: &[[u8; 9]; 9],
        marks: &[[MarkSet; 9]; 9],
    ) {
        let grid = self.grid_mut(id);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if grid.given[row][col] == 0 {
                    grid.current[row][col] = current[row][col];
                    grid.marks[row][col] = marks[row][col];
                }
            }
        }
    }

    /// True when every grid's current values equal its solution.
    pub fn is_solved(&self) -> bool {
        self.grids.values().all(|g| g.current == g.solution)
    }

    /// Copy the solution over every cell and drop all marks.
    pub(crate) fn reveal_all(&mut self) {
        for grid in self.grids.values_mut() {
            grid.current = grid.solution;
            grid.marks = [[MarkSet::empty(); 9]; 9];
        }
    }

    /// Back to the authored clues: `current := given`, marks dropped.
    pub(crate) fn reset_all(&mut self) {
        for grid in self.grids.values_mut() {
            grid.current = grid.given;
            grid.marks = [[MarkSet::empty(); 9]; 9];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GridId;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Valid solution grid from the classic shifted-row pattern.
    fn base_solution() -> [[u8; 9]; 9] {
        let mut s = [[0u8; 9]; 9];
        for (r, row) in s.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = ((r * 3 + r / 3 + c) % 9 + 1) as u8;
            }
        }
        s
    }

    /// The base solution shifted by six rows and six columns: a valid grid
    /// whose box 0 equals the base grid's box 8, as twin-nw requires.
    fn shifted_solution() -> [[u8; 9]; 9] {
        let base = base_solution();
        let mut s = [[0u8; 9]; 9];
        for (r, row) in s.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = base[(r + 6) % 9][(c + 6) % 9];
            }
        }
        s
    }

    fn twin_grids(given_primary: [[u8; 9]; 9]) -> BTreeMap<GridId, PuzzleGrid> {
        let mut grids = BTreeMap::new();
        grids.insert(
            GridId::Primary,
            PuzzleGrid { given: given_primary, solution: base_solution() },
        );
        grids.insert(
            GridId::Secondary,
            PuzzleGrid { given: [[0; 9]; 9], solution: shifted_solution() },
        );
        grids
    }

    fn empty_twin_board() -> CompositeBoard {
        CompositeBoard::new(ModeId::TwinNw, &twin_grids([[0; 9]; 9])).unwrap()
    }

    #[test]
    fn test_construct_rejects_wrong_grid_set() {
        let mut grids = twin_grids([[0; 9]; 9]);
        grids.remove(&GridId::Secondary);
        assert!(matches!(
            CompositeBoard::new(ModeId::TwinNw, &grids),
            Err(PuzzleError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_set_value_syncs_mirror() {
        let mut board = empty_twin_board();
        let canonical = CellRef::new(GridId::Primary, 8, 8);
        let mirror = CellRef::new(GridId::Secondary, 2, 2);
        let affected = board.set_value(canonical, 7).unwrap();
        assert_eq!(affected, vec![canonical, mirror]);
        assert_eq!(board.value(mirror), 7);
    }

    #[test]
    fn test_set_value_syncs_from_mirror_side() {
        let mut board = empty_twin_board();
        let canonical = CellRef::new(GridId::Primary, 6, 6);
        let mirror = CellRef::new(GridId::Secondary, 0, 0);
        let affected = board.set_value(mirror, 4).unwrap();
        assert_eq!(affected, vec![mirror, canonical]);
        assert_eq!(board.value(canonical), 4);
    }

    #[test]
    fn test_ordinary_cell_affects_only_itself() {
        let mut board = empty_twin_board();
        let cell = CellRef::new(GridId::Primary, 0, 0);
        assert_eq!(board.set_value(cell, 9).unwrap(), vec![cell]);
    }

    #[test]
    fn test_set_value_clears_marks_both_sides() {
        let mut board = empty_twin_board();
        let canonical = CellRef::new(GridId::Primary, 7, 7);
        let mirror = CellRef::new(GridId::Secondary, 1, 1);
        board.toggle_mark(canonical, 3).unwrap();
        assert_eq!(board.marks(mirror).to_vec(), vec![3]);
        board.set_value(mirror, 5).unwrap();
        assert!(board.marks(canonical).is_empty());
        assert!(board.marks(mirror).is_empty());
    }

    #[test]
    fn test_toggle_mark_copies_whole_set() {
        let mut board = empty_twin_board();
        let canonical = CellRef::new(GridId::Primary, 6, 7);
        let mirror = CellRef::new(GridId::Secondary, 0, 1);
        board.toggle_mark(canonical, 2).unwrap();
        board.toggle_mark(mirror, 5).unwrap();
        assert_eq!(board.marks(canonical).to_vec(), vec![2, 5]);
        assert_eq!(board.marks(mirror).to_vec(), vec![2, 5]);
    }

    #[test]
    fn test_given_cell_locked() {
        let mut given = [[0u8; 9]; 9];
        given[4][4] = base_solution()[4][4];
        let mut board = CompositeBoard::new(ModeId::TwinNw, &twin_grids(given)).unwrap();
        let cell = CellRef::new(GridId::Primary, 4, 4);
        let before = board.clone();
        assert_eq!(board.set_value(cell, 1), Err(Rejection::GivenCellLocked));
        assert_eq!(board.toggle_mark(cell, 1), Err(Rejection::GivenCellLocked));
        assert_eq!(board.clear_cell(cell), Err(Rejection::GivenCellLocked));
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_empty_cell_reports_nothing() {
        let mut board = empty_twin_board();
        let cell = CellRef::new(GridId::Primary, 3, 3);
        assert!(board.clear_cell(cell).unwrap().is_empty());
        board.set_value(cell, 2).unwrap();
        assert_eq!(board.clear_cell(cell).unwrap(), vec![cell]);
        assert_eq!(board.value(cell), 0);
    }

    #[test]
    fn test_is_solved() {
        let mut grids = BTreeMap::new();
        grids.insert(
            GridId::Main,
            PuzzleGrid { given: base_solution(), solution: base_solution() },
        );
        let board = CompositeBoard::new(ModeId::Standard, &grids).unwrap();
        assert!(board.is_solved());
        assert!(!empty_twin_board().is_solved());
    }

    /// Shared pairs stay equal through an arbitrary edit sequence.
    #[test]
    fn test_sync_invariant_under_random_edits() {
        let mut rng = StdRng::seed_from_u64(42);
        for &mode_id in &[ModeId::TwinNw, ModeId::TwinSe, ModeId::Samurai] {
            let mode = Mode::get(mode_id);
            let mut grids = BTreeMap::new();
            for &id in mode.grid_ids {
                grids.insert(id, PuzzleGrid { given: [[0; 9]; 9], solution: base_solution() });
            }
            let mut board = CompositeBoard::new(mode_id, &grids).unwrap();
            for _ in 0..500 {
                let grid = mode.grid_ids[rng.gen_range(0..mode.grid_ids.len())];
                let cell = CellRef::new(grid, rng.gen_range(0..9), rng.gen_range(0..9));
                match rng.gen_range(0..3) {
                    0 => {
                        board.set_value(cell, rng.gen_range(0..=9)).unwrap();
                    }
                    1 => {
                        board.toggle_mark(cell, rng.gen_range(1..=9)).unwrap();
                    }
                    _ => {
                        board.clear_cell(cell).unwrap();
                    }
                }
            }
            for (cell, role) in board.overlap().iter() {
                let partner = role.partner();
                assert_eq!(board.value(cell), board.value(partner), "{mode_id}: {cell}");
                assert_eq!(board.marks(cell), board.marks(partner), "{mode_id}: {cell}");
            }
        }
    }
}
