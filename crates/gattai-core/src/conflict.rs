//! Row, column, and box conflicts, extended across grid overlaps.

use crate::board::{CompositeBoard, GRID_SIZE};
use crate::mode::CellRef;
use std::collections::HashSet;

/// Cells in `cell`'s own grid holding `value` in the same row, column, or
/// box. The cell itself is excluded; a zero value never conflicts.
pub fn check_row_col_box(board: &CompositeBoard, cell: CellRef, value: u8) -> Vec<CellRef> {
    if value == 0 {
        return Vec::new();
    }
    let grid = board.current_grid(cell.grid);
    let mut conflicts = Vec::new();

    for col in 0..GRID_SIZE {
        if col != cell.col && grid[cell.row][col] == value {
            conflicts.push(CellRef::new(cell.grid, cell.row, col));
        }
    }

    for row in 0..GRID_SIZE {
        if row != cell.row && grid[row][cell.col] == value {
            conflicts.push(CellRef::new(cell.grid, row, cell.col));
        }
    }

    let base_row = cell.row / 3 * 3;
    let base_col = cell.col / 3 * 3;
    for row in base_row..base_row + 3 {
        for col in base_col..base_col + 3 {
            if (row != cell.row || col != cell.col) && grid[row][col] == value {
                conflicts.push(CellRef::new(cell.grid, row, col));
            }
        }
    }

    conflicts
}

/// Conflicts seen through the paired grid when `cell` is shared: the
/// synchronized value already lives at the partner, so anything clashing
/// with it over there clashes with this cell too.
pub fn check_overlap_conflicts(board: &CompositeBoard, cell: CellRef, value: u8) -> Vec<CellRef> {
    if value == 0 {
        return Vec::new();
    }
    match board.overlap().partner(cell) {
        Some(partner) => check_row_col_box(board, partner, value),
        None => Vec::new(),
    }
}

/// Every cell involved in any conflict anywhere on the board: each
/// conflicted cell is flagged together with the cells it clashes with.
/// Recomputed wholesale after each mutation.
pub fn full_board_scan(board: &CompositeBoard) -> HashSet<CellRef> {
    let mut flagged = HashSet::new();
    for cell in board.cells() {
        let value = board.value(cell);
        if value == 0 {
            continue;
        }
        let mut conflicts = check_row_col_box(board, cell, value);
        conflicts.extend(check_overlap_conflicts(board, cell, value));
        if !conflicts.is_empty() {
            flagged.insert(cell);
            flagged.extend(conflicts);
        }
    }
    flagged
}
