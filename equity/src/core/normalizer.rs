//! Sparse ⇄ dense sheet conversion
//!
//! Documents persist sheets as nested maps keyed `"row_<i>"` → `"col_<j>"`.
//! That key scheme lives only here; everything else works with the dense
//! `Grid`.

use serde::{Deserialize, Serialize};
use shared::{component_warn, ComponentId, Participant};
use std::collections::BTreeMap;

use super::rubric::{Cell, Grid, RubricSheet, FIXED_COLUMNS, SHEET_HEIGHT};

const ROW_PREFIX: &str = "row";
const COL_PREFIX: &str = "col";

/// Most participants a persisted sheet may carry columns for
pub const MAX_PARTICIPANTS: usize = 64;

/// Keys at or past these indices are ignored on load
pub const MAX_ROWS: usize = SHEET_HEIGHT;
pub const MAX_COLUMNS: usize = FIXED_COLUMNS + MAX_PARTICIPANTS;

/// Persisted sheet shape: `{ "row_<i>": { "col_<j>": { value, readOnly, className } } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SparseSheet(BTreeMap<String, BTreeMap<String, Cell>>);

impl SparseSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, row: usize, col: usize, cell: Cell) {
        self.0.entry(row_key(row)).or_default().insert(col_key(col), cell);
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.0.get(&row_key(row)).and_then(|cols| cols.get(&col_key(col)))
    }

    /// Remove a single cell, mostly useful for reproducing legacy documents
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Cell> {
        self.0.get_mut(&row_key(row)).and_then(|cols| cols.remove(&col_key(col)))
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Cell>)> {
        self.0.iter()
    }
}

pub fn row_key(index: usize) -> String {
    format!("{ROW_PREFIX}_{index}")
}

pub fn col_key(index: usize) -> String {
    format!("{COL_PREFIX}_{index}")
}

/// Trailing integer after the last `_`, e.g. `row_10` → 10
pub fn parse_key_index(key: &str) -> Option<usize> {
    key.rsplit_once('_').and_then(|(_, n)| n.parse().ok())
}

/// Sort keyed entries numerically by their trailing index, dropping keys
/// that carry no index or an index at or past `limit`
fn indexed<'a, T>(entries: impl Iterator<Item = (&'a String, T)>, limit: usize) -> Vec<(usize, T)> {
    let mut out: Vec<(usize, T)> = entries
        .filter_map(|(key, value)| match parse_key_index(key) {
            Some(idx) if idx < limit => Some((idx, value)),
            Some(_) => {
                component_warn!(ComponentId::current(), "Ignoring out-of-range sheet key {:?}", key);
                None
            }
            None => {
                component_warn!(ComponentId::current(), "Ignoring malformed sheet key {:?}", key);
                None
            }
        })
        .collect();
    out.sort_by_key(|(idx, _)| *idx);
    out
}

/// Dense → sparse
pub fn to_sparse(grid: &Grid) -> SparseSheet {
    let mut sparse = SparseSheet::new();
    for (r, row) in grid.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            sparse.insert(r, c, cell.clone());
        }
    }
    sparse
}

/// Sparse → dense.
///
/// The result is rectangular: its width is the widest row seen and any gap is
/// filled with the default cell for that row (empty text on the header row,
/// 0 elsewhere).
pub fn to_dense(sparse: &SparseSheet) -> Grid {
    to_dense_padded(sparse, 0, 0)
}

/// Sparse → dense, padded to at least `min_width` × `min_height`
pub fn to_dense_padded(sparse: &SparseSheet, min_width: usize, min_height: usize) -> Grid {
    let rows: Vec<(usize, Vec<(usize, &Cell)>)> = indexed(sparse.rows(), MAX_ROWS)
        .into_iter()
        .map(|(r, cols)| (r, indexed(cols.iter(), MAX_COLUMNS)))
        .collect();

    let height = rows
        .iter()
        .map(|(r, _)| r + 1)
        .max()
        .unwrap_or(0)
        .max(min_height);
    let width = rows
        .iter()
        .flat_map(|(_, cols)| cols.iter().map(|(c, _)| c + 1))
        .max()
        .unwrap_or(0)
        .max(min_width);

    let mut grid: Grid = (0..height)
        .map(|r| vec![Cell::default_for_row(r); width])
        .collect();

    for (r, cols) in rows {
        for (c, cell) in cols {
            grid[r][c] = cell.clone();
        }
    }
    grid
}

/// Persisted form of a sheet
pub fn sheet_to_sparse(sheet: &RubricSheet) -> SparseSheet {
    to_sparse(&sheet.to_grid())
}

/// Rebuild a canonical sheet for the current roster from its persisted form
pub fn sheet_from_sparse(sparse: &SparseSheet, roster: &[Participant]) -> RubricSheet {
    RubricSheet::from_grid(&to_dense(sparse), roster)
}
