//! Persisted session state, produced for and consumed from an external
//! store. `given` and `solution` are never embedded; they re-derive from
//! the puzzle source on restore.

use crate::history::Move;
use crate::marks::MarkSet;
use crate::mode::GridId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current_grids: BTreeMap<GridId, [[u8; 9]; 9]>,
    /// Per-cell marks; each cell serializes as a sorted digit array.
    pub marks: BTreeMap<GridId, [[MarkSet; 9]; 9]>,
    pub history: Vec<Move>,
    pub started_at: Option<u64>,
    pub accumulated_paused_ms: u64,
    pub revealed: bool,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut current_grids = BTreeMap::new();
        current_grids.insert(GridId::Main, [[0u8; 9]; 9]);
        let mut marks = BTreeMap::new();
        let mut cell_marks = [[MarkSet::empty(); 9]; 9];
        cell_marks[4][5] = MarkSet::from_digits(&[9, 2]).unwrap();
        marks.insert(GridId::Main, cell_marks);
        let snapshot = SessionSnapshot {
            current_grids,
            marks,
            history: Vec::new(),
            started_at: Some(1_700_000_000_000),
            accumulated_paused_ms: 4_200,
            revealed: false,
        };

        let json = snapshot.to_json();
        assert!(json.contains("\"accumulatedPausedMs\":4200"));
        assert!(json.contains("\"startedAt\":1700000000000"));
        let back = SessionSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.marks[&GridId::Main][4][5].to_vec(), vec![2, 9]);
    }
}
