//! Puzzle input format: JSON from the puzzle source, validated fail-fast so
//! that no board state is ever built from a partial or corrupt file.

use crate::error::PuzzleError;
use crate::mode::{GridId, Mode, ModeId};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Validated clue/solution pair for one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleGrid {
    /// 0 = empty, 1-9 = fixed clue.
    pub given: [[u8; 9]; 9],
    pub solution: [[u8; 9]; 9],
}

/// A fully validated puzzle, ready for board construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPuzzle {
    pub mode: ModeId,
    pub grids: BTreeMap<GridId, PuzzleGrid>,
    /// Opaque metadata from the standard format; composite files carry none.
    pub date: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Deserialize)]
struct RawStandard {
    date: String,
    difficulty: String,
    grid: Vec<Vec<u8>>,
    solution: Vec<Vec<u8>>,
}

#[derive(Deserialize)]
struct RawGattai {
    mode: ModeId,
    grids: BTreeMap<GridId, RawGrid>,
}

#[derive(Deserialize)]
struct RawGrid {
    grid: Vec<Vec<u8>>,
    solution: Vec<Vec<u8>>,
}

/// Parse a standard single-grid puzzle: `{date, difficulty, grid, solution}`.
pub fn parse_standard(json: &str) -> Result<LoadedPuzzle, PuzzleError> {
    let raw: RawStandard = serde_json::from_str(json)?;
    let mut grids = BTreeMap::new();
    grids.insert(GridId::Main, convert(GridId::Main, &raw.grid, &raw.solution)?);
    log::debug!("loaded standard puzzle for {}", raw.date);
    Ok(LoadedPuzzle {
        mode: ModeId::Standard,
        grids,
        date: Some(raw.date),
        difficulty: Some(raw.difficulty),
    })
}

/// Parse a composite puzzle: `{mode, grids: {gridId: {grid, solution}}}`.
/// The grid set must match the named mode's declaration exactly.
pub fn parse_gattai(json: &str) -> Result<LoadedPuzzle, PuzzleError> {
    let raw: RawGattai = serde_json::from_str(json)?;
    let mode = Mode::get(raw.mode);
    let missing: Vec<GridId> = mode
        .grid_ids
        .iter()
        .copied()
        .filter(|g| !raw.grids.contains_key(g))
        .collect();
    let unexpected: Vec<GridId> = raw
        .grids
        .keys()
        .copied()
        .filter(|&g| !mode.declares(g))
        .collect();
    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(PuzzleError::ShapeMismatch { mode: raw.mode, missing, unexpected });
    }
    let mut grids = BTreeMap::new();
    for (&id, g) in &raw.grids {
        grids.insert(id, convert(id, &g.grid, &g.solution)?);
    }
    log::debug!("loaded {} puzzle, {} grids", mode.display_name, grids.len());
    Ok(LoadedPuzzle { mode: raw.mode, grids, date: None, difficulty: None })
}

fn convert(id: GridId, grid: &[Vec<u8>], solution: &[Vec<u8>]) -> Result<PuzzleGrid, PuzzleError> {
    let given = to_array(id, "grid", grid)?;
    let solution = to_array(id, "solution", solution)?;
    check_range(id, "grid", &given, 0)?;
    check_range(id, "solution", &solution, 1)?;
    Ok(PuzzleGrid { given, solution })
}

fn to_array(grid: GridId, which: &'static str, rows: &[Vec<u8>]) -> Result<[[u8; 9]; 9], PuzzleError> {
    if rows.len() != 9 || rows.iter().any(|row| row.len() != 9) {
        return Err(PuzzleError::BadDimensions { grid, which });
    }
    let mut out = [[0u8; 9]; 9];
    for (r, row) in rows.iter().enumerate() {
        out[r].copy_from_slice(row);
    }
    Ok(out)
}

fn check_range(
    grid: GridId,
    which: &'static str,
    cells: &[[u8; 9]; 9],
    min: u8,
) -> Result<(), PuzzleError> {
    for (row, cols) in cells.iter().enumerate() {
        for (col, &value) in cols.iter().enumerate() {
            if value < min || value > 9 {
                return Err(PuzzleError::CellOutOfRange { grid, which, row, col, value });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(fill: u8) -> Vec<Vec<u8>> {
        vec![vec![fill; 9]; 9]
    }

    /// Any valid solution grid works for schema tests; the classic shifted
    /// pattern keeps it honest.
    fn solution_rows() -> Vec<Vec<u8>> {
        (0..9)
            .map(|r: usize| (0..9).map(|c: usize| ((r * 3 + r / 3 + c) % 9 + 1) as u8).collect())
            .collect()
    }

    #[test]
    fn test_parse_standard_ok() {
        let puzzle = json!({
            "date": "2026-01-15",
            "difficulty": "easy",
            "grid": rows(0),
            "solution": solution_rows(),
        });
        let loaded = parse_standard(&puzzle.to_string()).unwrap();
        assert_eq!(loaded.mode, ModeId::Standard);
        assert_eq!(loaded.grids.len(), 1);
        assert!(loaded.grids.contains_key(&GridId::Main));
        assert_eq!(loaded.date.as_deref(), Some("2026-01-15"));
    }

    #[test]
    fn test_parse_gattai_ok() {
        let puzzle = json!({
            "mode": "twin-nw",
            "grids": {
                "primary": { "grid": rows(0), "solution": solution_rows() },
                "secondary": { "grid": rows(0), "solution": solution_rows() },
            },
        });
        let loaded = parse_gattai(&puzzle.to_string()).unwrap();
        assert_eq!(loaded.mode, ModeId::TwinNw);
        assert_eq!(loaded.grids.len(), 2);
    }

    #[test]
    fn test_missing_grid_is_shape_mismatch() {
        let puzzle = json!({
            "mode": "twin-nw",
            "grids": {
                "primary": { "grid": rows(0), "solution": solution_rows() },
            },
        });
        match parse_gattai(&puzzle.to_string()) {
            Err(PuzzleError::ShapeMismatch { missing, unexpected, .. }) => {
                assert_eq!(missing, vec![GridId::Secondary]);
                assert!(unexpected.is_empty());
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_grid_is_shape_mismatch() {
        let puzzle = json!({
            "mode": "twin-nw",
            "grids": {
                "primary": { "grid": rows(0), "solution": solution_rows() },
                "secondary": { "grid": rows(0), "solution": solution_rows() },
                "center": { "grid": rows(0), "solution": solution_rows() },
            },
        });
        match parse_gattai(&puzzle.to_string()) {
            Err(PuzzleError::ShapeMismatch { unexpected, .. }) => {
                assert_eq!(unexpected, vec![GridId::Center]);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_dimensions() {
        let mut short = rows(0);
        short[4].pop();
        let puzzle = json!({
            "mode": "twin-nw",
            "grids": {
                "primary": { "grid": short, "solution": solution_rows() },
                "secondary": { "grid": rows(0), "solution": solution_rows() },
            },
        });
        assert!(matches!(
            parse_gattai(&puzzle.to_string()),
            Err(PuzzleError::BadDimensions { which: "grid", .. })
        ));
    }

    #[test]
    fn test_grid_value_out_of_range() {
        let mut bad = rows(0);
        bad[2][7] = 10;
        let puzzle = json!({
            "date": "2026-01-15",
            "difficulty": "easy",
            "grid": bad,
            "solution": solution_rows(),
        });
        assert!(matches!(
            parse_standard(&puzzle.to_string()),
            Err(PuzzleError::CellOutOfRange { row: 2, col: 7, value: 10, .. })
        ));
    }

    #[test]
    fn test_solution_zero_rejected() {
        let mut bad = solution_rows();
        bad[0][0] = 0;
        let puzzle = json!({
            "date": "2026-01-15",
            "difficulty": "easy",
            "grid": rows(0),
            "solution": bad,
        });
        assert!(matches!(
            parse_standard(&puzzle.to_string()),
            Err(PuzzleError::CellOutOfRange { which: "solution", value: 0, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_gattai("{not json"), Err(PuzzleError::Json(_))));
        assert!(matches!(
            parse_gattai("{\"mode\": \"no-such-mode\", \"grids\": {}}"),
            Err(PuzzleError::Json(_))
        ));
    }
}
