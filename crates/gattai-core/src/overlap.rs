//! Resolves which physical cells are shared between overlapping grids.

use crate::mode::{CellRef, Mode};
use std::collections::HashMap;

/// Role of a shared cell within its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapRole {
    /// Source-of-truth side; `pair` holds the synchronized duplicate.
    Canonical { pair: CellRef },
    /// Duplicate side; the true state lives at `canonical`.
    Mirror { canonical: CellRef },
}

impl OverlapRole {
    /// The other physical cell of the pair, whichever side this is.
    pub fn partner(&self) -> CellRef {
        match *self {
            OverlapRole::Canonical { pair } => pair,
            OverlapRole::Mirror { canonical } => canonical,
        }
    }
}

/// Box index (0-8, row-major) of a cell.
pub fn box_index(row: usize, col: usize) -> usize {
    (row / 3) * 3 + col / 3
}

/// The nine cells of a box, row-major from its top-left corner.
pub fn box_cells(box_index: usize) -> [(usize, usize); 9] {
    debug_assert!(box_index < 9);
    let base_row = (box_index / 3) * 3;
    let base_col = (box_index % 3) * 3;
    let mut cells = [(0, 0); 9];
    for (i, cell) in cells.iter_mut().enumerate() {
        *cell = (base_row + i / 3, base_col + i % 3);
    }
    cells
}

/// Cell-equivalence map for one mode. Cells absent from the map are
/// ordinary. Pure function of the static layout, computed once per board.
#[derive(Debug, Clone, Default)]
pub struct OverlapMap {
    cells: HashMap<CellRef, OverlapRole>,
}

impl OverlapMap {
    /// Pair the cells of every declared overlap positionally: the i-th cell
    /// of box A in row-major order is the same Sudoku cell as the i-th cell
    /// of box B. This ordering decides which coordinates in the two grids
    /// name the same physical cell, so it must never change.
    pub fn for_mode(mode: &Mode) -> Self {
        let mut cells = HashMap::new();
        for decl in mode.overlaps {
            let a_cells = box_cells(decl.box_a);
            let b_cells = box_cells(decl.box_b);
            for (&(ar, ac), &(br, bc)) in a_cells.iter().zip(b_cells.iter()) {
                let a = CellRef::new(decl.grid_a, ar, ac);
                let b = CellRef::new(decl.grid_b, br, bc);
                let prev_a = cells.insert(a, OverlapRole::Canonical { pair: b });
                let prev_b = cells.insert(b, OverlapRole::Mirror { canonical: a });
                debug_assert!(
                    prev_a.is_none() && prev_b.is_none(),
                    "cell assigned to two overlap pairs"
                );
            }
        }
        OverlapMap { cells }
    }

    pub fn role(&self, cell: CellRef) -> Option<OverlapRole> {
        self.cells.get(&cell).copied()
    }

    pub fn is_overlapping(&self, cell: CellRef) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Partner of a shared cell, or `None` for ordinary cells.
    pub fn partner(&self, cell: CellRef) -> Option<CellRef> {
        self.cells.get(&cell).map(|role| role.partner())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellRef, OverlapRole)> + '_ {
        self.cells.iter().map(|(&cell, &role)| (cell, role))
    }
}
