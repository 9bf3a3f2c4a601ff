//! Static catalog of puzzle layouts: which grids each mode contains, where
//! they sit on the logical canvas, and which 3x3 boxes they share.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one 9x9 grid within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridId {
    Main,
    Center,
    Nw,
    Ne,
    Sw,
    Se,
    Primary,
    Secondary,
}

impl GridId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridId::Main => "main",
            GridId::Center => "center",
            GridId::Nw => "nw",
            GridId::Ne => "ne",
            GridId::Sw => "sw",
            GridId::Se => "se",
            GridId::Primary => "primary",
            GridId::Secondary => "secondary",
        }
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for a puzzle layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeId {
    Standard,
    Samurai,
    TwinNw,
    TwinNe,
    TwinSw,
    TwinSe,
}

impl ModeId {
    /// Parse a wire identifier such as `"twin-nw"`.
    pub fn parse(s: &str) -> Option<ModeId> {
        ModeId::all().iter().copied().find(|m| m.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeId::Standard => "standard",
            ModeId::Samurai => "samurai",
            ModeId::TwinNw => "twin-nw",
            ModeId::TwinNe => "twin-ne",
            ModeId::TwinSw => "twin-sw",
            ModeId::TwinSe => "twin-se",
        }
    }

    pub fn all() -> &'static [ModeId] {
        &[
            ModeId::Standard,
            ModeId::Samurai,
            ModeId::TwinNw,
            ModeId::TwinNe,
            ModeId::TwinSw,
            ModeId::TwinSe,
        ]
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical cell: a grid plus its local row/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub grid: GridId,
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(grid: GridId, row: usize, col: usize) -> Self {
        debug_assert!(row < 9 && col < 9);
        CellRef { grid, row, col }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r{}c{}", self.grid, self.row, self.col)
    }
}

/// Declares that box `box_a` of `grid_a` shares its nine cells with box
/// `box_b` of `grid_b`. Box indices are 0-8, row-major. The `grid_a` side is
/// the canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapDecl {
    pub grid_a: GridId,
    pub grid_b: GridId,
    pub box_a: usize,
    pub box_b: usize,
}

/// Immutable layout descriptor.
#[derive(Debug)]
pub struct Mode {
    pub id: ModeId,
    pub display_name: &'static str,
    /// Grid ids in draw order.
    pub grid_ids: &'static [GridId],
    pub logical_rows: usize,
    pub logical_cols: usize,
    /// Top-left corner of each grid on the logical canvas.
    pub origins: &'static [(GridId, usize, usize)],
    pub overlaps: &'static [OverlapDecl],
}

impl Mode {
    /// Look up the static descriptor for a mode id.
    pub fn get(id: ModeId) -> &'static Mode {
        match id {
            ModeId::Standard => &STANDARD,
            ModeId::Samurai => &SAMURAI,
            ModeId::TwinNw => &TWIN_NW,
            ModeId::TwinNe => &TWIN_NE,
            ModeId::TwinSw => &TWIN_SW,
            ModeId::TwinSe => &TWIN_SE,
        }
    }

    pub fn declares(&self, grid: GridId) -> bool {
        self.grid_ids.contains(&grid)
    }

    /// Logical canvas position of a grid's top-left cell.
    pub fn origin(&self, grid: GridId) -> Option<(usize, usize)> {
        self.origins
            .iter()
            .find(|&&(g, _, _)| g == grid)
            .map(|&(_, row, col)| (row, col))
    }
}

static STANDARD: Mode = Mode {
    id: ModeId::Standard,
    display_name: "Classic",
    grid_ids: &[GridId::Main],
    logical_rows: 9,
    logical_cols: 9,
    origins: &[(GridId::Main, 0, 0)],
    overlaps: &[],
};

static SAMURAI: Mode = Mode {
    id: ModeId::Samurai,
    display_name: "Samurai",
    grid_ids: &[GridId::Nw, GridId::Ne, GridId::Center, GridId::Sw, GridId::Se],
    logical_rows: 21,
    logical_cols: 21,
    origins: &[
        (GridId::Center, 6, 6),
        (GridId::Nw, 0, 0),
        (GridId::Ne, 0, 12),
        (GridId::Sw, 12, 0),
        (GridId::Se, 12, 12),
    ],
    overlaps: &[
        OverlapDecl { grid_a: GridId::Center, grid_b: GridId::Nw, box_a: 0, box_b: 8 },
        OverlapDecl { grid_a: GridId::Center, grid_b: GridId::Ne, box_a: 2, box_b: 6 },
        OverlapDecl { grid_a: GridId::Center, grid_b: GridId::Sw, box_a: 6, box_b: 2 },
        OverlapDecl { grid_a: GridId::Center, grid_b: GridId::Se, box_a: 8, box_b: 0 },
    ],
};

static TWIN_NW: Mode = Mode {
    id: ModeId::TwinNw,
    display_name: "Horizon",
    grid_ids: &[GridId::Primary, GridId::Secondary],
    logical_rows: 15,
    logical_cols: 15,
    origins: &[(GridId::Primary, 0, 0), (GridId::Secondary, 6, 6)],
    overlaps: &[OverlapDecl {
        grid_a: GridId::Primary,
        grid_b: GridId::Secondary,
        box_a: 8,
        box_b: 0,
    }],
};

static TWIN_NE: Mode = Mode {
    id: ModeId::TwinNe,
    display_name: "Sunrise",
    grid_ids: &[GridId::Primary, GridId::Secondary],
    logical_rows: 15,
    logical_cols: 15,
    origins: &[(GridId::Primary, 0, 6), (GridId::Secondary, 6, 0)],
    overlaps: &[OverlapDecl {
        grid_a: GridId::Primary,
        grid_b: GridId::Secondary,
        box_a: 6,
        box_b: 2,
    }],
};

static TWIN_SW: Mode = Mode {
    id: ModeId::TwinSw,
    display_name: "Sunset",
    grid_ids: &[GridId::Primary, GridId::Secondary],
    logical_rows: 15,
    logical_cols: 15,
    origins: &[(GridId::Primary, 6, 0), (GridId::Secondary, 0, 6)],
    overlaps: &[OverlapDecl {
        grid_a: GridId::Primary,
        grid_b: GridId::Secondary,
        box_a: 2,
        box_b: 6,
    }],
};

static TWIN_SE: Mode = Mode {
    id: ModeId::TwinSe,
    display_name: "Eclipse",
    grid_ids: &[GridId::Primary, GridId::Secondary],
    logical_rows: 15,
    logical_cols: 15,
    origins: &[(GridId::Primary, 6, 6), (GridId::Secondary, 0, 0)],
    overlaps: &[OverlapDecl {
        grid_a: GridId::Primary,
        grid_b: GridId::Secondary,
        box_a: 0,
        box_b: 8,
    }],
};
