//! Rubric sheet model
//!
//! The sheet is a fixed list of categories (rows) scored by every participant
//! (columns). Only values are stored; whether a cell is a header, a separator
//! or editable is derived from its position and the canonical category list.
//!
//! Grid coordinates used by the dense form:
//! - row 0 is the header, rows `1..=CATEGORY_COUNT` follow `CATEGORIES`
//! - column 0 is the category label, column 1 the importance weight and
//!   columns `2..2 + N` hold one score per participant

use serde::{Deserialize, Serialize};
use shared::{sort_participants, Participant};
use thiserror::Error;

use crate::error::{EquityError, EquityResult};

pub const HEADER_CATEGORY: &str = "Category";
pub const HEADER_IMPORTANCE: &str = "Importance";

/// Label column plus importance column
pub const FIXED_COLUMNS: usize = 2;
pub const IMPORTANCE_COLUMN: usize = 1;
pub const MAX_CELL_VALUE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    /// Visual group divider, never scored
    Separator,
    Scoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub kind: CategoryKind,
}

const fn separator(name: &'static str) -> Category {
    Category { name, kind: CategoryKind::Separator }
}

const fn scoring(name: &'static str) -> Category {
    Category { name, kind: CategoryKind::Scoring }
}

/// Canonical category rows in display order
pub const CATEGORIES: [Category; 21] = [
    separator("Input"),
    scoring("Idea"),
    scoring("Business Plan"),
    scoring("Domain Expertise"),
    scoring("Commitment & Risk"),
    scoring("Capital"),
    scoring("Intellectual Property"),
    separator("Execution"),
    scoring("Product Development"),
    scoring("Sales"),
    scoring("Marketing"),
    scoring("Fundraising"),
    scoring("Operations"),
    scoring("Hiring"),
    separator("Intangibles"),
    scoring("Leadership"),
    scoring("Network"),
    scoring("Reputation"),
    scoring("Vision"),
    scoring("Culture"),
    scoring("Availability"),
];

pub const CATEGORY_COUNT: usize = CATEGORIES.len();

/// Header row plus one row per category
pub const SHEET_HEIGHT: usize = CATEGORY_COUNT + 1;

/// Category shown on a grid row, `None` for the header row or past the end
pub fn category_for_row(row: usize) -> Option<&'static Category> {
    row.checked_sub(1).and_then(|idx| CATEGORIES.get(idx))
}

/// Index into `CATEGORIES` for a category label, ignoring case and padding
pub fn category_index(label: &str) -> Option<usize> {
    let wanted = label.trim();
    CATEGORIES
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(wanted))
}

pub fn is_header_row(row: usize) -> bool {
    row == 0
}

pub fn is_separator_row(row: usize) -> bool {
    matches!(category_for_row(row), Some(c) if c.kind == CategoryKind::Separator)
}

/// What a grid position means, derived from position alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Header,
    CategoryLabel,
    SeparatorLabel,
    SeparatorBlank,
    Importance,
    Score,
}

impl CellRole {
    pub fn is_editable(self) -> bool {
        matches!(self, CellRole::Importance | CellRole::Score)
    }

    /// Presentation class for the rendering layer
    pub fn class_name(self) -> &'static str {
        match self {
            CellRole::Header => "header-cell",
            CellRole::CategoryLabel => "category-cell",
            CellRole::SeparatorLabel => "separator-cell",
            CellRole::SeparatorBlank => "separator-blank",
            CellRole::Importance => "importance-cell",
            CellRole::Score => "score-cell",
        }
    }
}

/// Role of the cell at `(row, col)` on a sheet `width` columns wide
pub fn cell_role(row: usize, col: usize, width: usize) -> Option<CellRole> {
    if col >= width || row >= SHEET_HEIGHT {
        return None;
    }
    if is_header_row(row) {
        return Some(CellRole::Header);
    }
    let separator = is_separator_row(row);
    Some(match (separator, col) {
        (true, 0) => CellRole::SeparatorLabel,
        (true, _) => CellRole::SeparatorBlank,
        (false, 0) => CellRole::CategoryLabel,
        (false, IMPORTANCE_COLUMN) => CellRole::Importance,
        (false, _) => CellRole::Score,
    })
}

pub fn is_editable(row: usize, col: usize, width: usize) -> bool {
    cell_role(row, col, width).map(CellRole::is_editable).unwrap_or(false)
}

/// A raw cell value as found in persisted documents.
///
/// Older documents mix numbers, numeric strings, empty strings and nulls, so
/// every shape is accepted and interpreted leniently on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Int(0)
    }
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    /// Interpret as a 0-100 score; anything unusable reads as 0
    pub fn as_score(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Int(v) => u8::try_from(*v)
                .ok()
                .filter(|v| *v <= MAX_CELL_VALUE)
                .unwrap_or(0),
            CellValue::Float(v) if v.fract() == 0.0 && (0.0..=100.0).contains(v) => *v as u8,
            CellValue::Float(_) => 0,
            CellValue::Text(s) => parse_cell_input(Some(s)).unwrap_or(0),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// One dense-grid cell in the persisted `{ value, readOnly, className }` shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            read_only: false,
            class_name: None,
        }
    }

    pub fn number(value: u8) -> Self {
        Self::new(CellValue::Int(i64::from(value)))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(CellValue::Text(value.into()))
    }

    /// Filler used when a persisted sheet lacks a cell
    pub fn default_for_row(row: usize) -> Self {
        if is_header_row(row) {
            Self::text("")
        } else {
            Self::number(0)
        }
    }

    fn with_role(mut self, role: CellRole) -> Self {
        self.read_only = !role.is_editable();
        self.class_name = Some(role.class_name().to_string());
        self
    }
}

/// Dense row-major grid
pub type Grid = Vec<Vec<Cell>>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellInputError {
    #[error("value is not a whole number")]
    NotInteger,
    #[error("value {0} is outside 0-100")]
    OutOfRange(i64),
}

/// Parse typed input for an importance or score cell.
///
/// Empty input means 0. Anything containing a decimal point is rejected
/// rather than rounded.
pub fn parse_cell_input(input: Option<&str>) -> Result<u8, CellInputError> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(0);
    };
    if raw.contains('.') {
        return Err(CellInputError::NotInteger);
    }
    let value: i64 = raw.parse().map_err(|_| CellInputError::NotInteger)?;
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_CELL_VALUE)
        .ok_or(CellInputError::OutOfRange(value))
}

/// Result of applying typed input to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    Accepted(u8),
    /// Input was rejected and the previous value kept
    Kept(u8),
}

impl EditOutcome {
    pub fn value(self) -> u8 {
        match self {
            EditOutcome::Accepted(v) | EditOutcome::Kept(v) => v,
        }
    }
}

/// A participant's scoring sheet: importance per category and one score per
/// participant per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricSheet {
    participants: Vec<Participant>,
    importance: Vec<u8>,
    scores: Vec<Vec<u8>>,
}

impl RubricSheet {
    /// Zeroed sheet with columns in roster order
    pub fn new(participants: &[Participant]) -> Self {
        let mut participants = participants.to_vec();
        sort_participants(&mut participants);
        let width = participants.len();
        Self {
            participants,
            importance: vec![0; CATEGORY_COUNT],
            scores: vec![vec![0; width]; CATEGORY_COUNT],
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Grid width: label, importance and one column per participant
    pub fn width(&self) -> usize {
        FIXED_COLUMNS + self.participants.len()
    }

    pub fn height(&self) -> usize {
        SHEET_HEIGHT
    }

    /// Importance weight of a category; separators always read 0
    pub fn importance(&self, category: usize) -> u8 {
        match CATEGORIES.get(category) {
            Some(c) if c.kind == CategoryKind::Scoring => self.importance[category],
            _ => 0,
        }
    }

    /// Score a participant column received in a category; separators always read 0
    pub fn score(&self, category: usize, participant: usize) -> u8 {
        match CATEGORIES.get(category) {
            Some(c) if c.kind == CategoryKind::Scoring => self.scores[category]
                .get(participant)
                .copied()
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Indices of the categories that carry weight
    pub fn scoring_categories() -> impl Iterator<Item = usize> {
        CATEGORIES
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == CategoryKind::Scoring)
            .map(|(i, _)| i)
    }

    pub fn set_importance(&mut self, category: &str, value: u8) -> EquityResult<()> {
        let row = Self::scoring_row(category)?;
        self.importance[row - 1] = value.min(MAX_CELL_VALUE);
        Ok(())
    }

    pub fn set_score(&mut self, category: &str, participant: usize, value: u8) -> EquityResult<()> {
        let row = Self::scoring_row(category)?;
        let col = FIXED_COLUMNS + participant;
        let slot = self.scores[row - 1]
            .get_mut(participant)
            .ok_or(EquityError::CellOutOfRange { row, col })?;
        *slot = value.min(MAX_CELL_VALUE);
        Ok(())
    }

    fn scoring_row(category: &str) -> EquityResult<usize> {
        match category_index(category) {
            Some(idx) if CATEGORIES[idx].kind == CategoryKind::Scoring => Ok(idx + 1),
            Some(idx) => Err(EquityError::CellOutOfRange { row: idx + 1, col: IMPORTANCE_COLUMN }),
            None => Err(EquityError::CellOutOfRange { row: SHEET_HEIGHT, col: IMPORTANCE_COLUMN }),
        }
    }

    /// Numeric value at a grid position, for editable cells only
    pub fn value_at(&self, row: usize, col: usize) -> Option<u8> {
        if !is_editable(row, col, self.width()) {
            return None;
        }
        let category = row - 1;
        Some(if col == IMPORTANCE_COLUMN {
            self.importance[category]
        } else {
            self.scores[category][col - FIXED_COLUMNS]
        })
    }

    /// Apply typed input to a grid cell.
    ///
    /// Invalid input leaves the previous value in place rather than snapping
    /// to the nearest bound.
    pub fn apply_edit(&mut self, row: usize, col: usize, input: Option<&str>) -> EquityResult<EditOutcome> {
        let previous = self
            .value_at(row, col)
            .ok_or(EquityError::CellOutOfRange { row, col })?;

        let value = match parse_cell_input(input) {
            Ok(value) => value,
            Err(_) => return Ok(EditOutcome::Kept(previous)),
        };

        let category = row - 1;
        if col == IMPORTANCE_COLUMN {
            self.importance[category] = value;
        } else {
            self.scores[category][col - FIXED_COLUMNS] = value;
        }
        Ok(EditOutcome::Accepted(value))
    }

    /// Dense grid with presentation flags derived from position
    pub fn to_grid(&self) -> Grid {
        let width = self.width();
        let mut grid = Vec::with_capacity(SHEET_HEIGHT);

        let mut header = vec![Cell::text(HEADER_CATEGORY), Cell::text(HEADER_IMPORTANCE)];
        header.extend(self.participants.iter().map(|p| Cell::text(p.display_name.clone())));
        grid.push(
            header
                .into_iter()
                .map(|c| c.with_role(CellRole::Header))
                .collect(),
        );

        for (category, info) in CATEGORIES.iter().enumerate() {
            let mut cells = Vec::with_capacity(width);
            match info.kind {
                CategoryKind::Separator => {
                    cells.push(Cell::text(info.name).with_role(CellRole::SeparatorLabel));
                    cells.extend((1..width).map(|_| Cell::text("").with_role(CellRole::SeparatorBlank)));
                }
                CategoryKind::Scoring => {
                    cells.push(Cell::text(info.name).with_role(CellRole::CategoryLabel));
                    cells.push(Cell::number(self.importance[category]).with_role(CellRole::Importance));
                    cells.extend(
                        self.scores[category]
                            .iter()
                            .map(|&score| Cell::number(score).with_role(CellRole::Score)),
                    );
                }
            }
            grid.push(cells);
        }
        grid
    }

    /// Rebuild a canonical sheet for the current roster from any dense grid.
    ///
    /// Rows are matched by category label, then by position when the label is
    /// missing or unknown. Participant columns are matched by header name; a
    /// participant with no named column falls back to their position only
    /// when that column has no header name. Anything absent reads as 0, so
    /// older, smaller sheets load.
    pub fn from_grid(grid: &Grid, roster: &[Participant]) -> Self {
        let mut sheet = Self::new(roster);

        let header: Vec<String> = grid
            .first()
            .map(|row| row.iter().map(|c| c.value.as_text().trim().to_string()).collect())
            .unwrap_or_default();
        let columns = sheet.resolve_columns(&header);
        let rows = resolve_rows(grid);

        for (category, grid_row) in rows.iter().enumerate() {
            let Some(cells) = grid_row.and_then(|r| grid.get(r)) else {
                continue;
            };
            if CATEGORIES[category].kind == CategoryKind::Separator {
                continue;
            }
            let read = |col: usize| cells.get(col).map(|c| c.value.as_score()).unwrap_or(0);
            sheet.importance[category] = read(IMPORTANCE_COLUMN);
            for (participant, col) in columns.iter().enumerate() {
                if let Some(col) = col {
                    sheet.scores[category][participant] = read(*col);
                }
            }
        }
        sheet
    }

    /// Grid column holding each participant's scores, if any.
    ///
    /// Each header column is claimed at most once, so participants sharing a
    /// display name take successive columns in sheet order. Columns headed by
    /// someone no longer on the roster are never reassigned.
    fn resolve_columns(&self, header: &[String]) -> Vec<Option<usize>> {
        let mut claimed = vec![false; header.len()];
        let mut columns = Vec::with_capacity(self.participants.len());

        for p in &self.participants {
            let col = (FIXED_COLUMNS..header.len()).find(|&c| !claimed[c] && header[c] == p.display_name);
            if let Some(c) = col {
                claimed[c] = true;
            }
            columns.push(col);
        }

        for (idx, col) in columns.iter_mut().enumerate() {
            let positional = FIXED_COLUMNS + idx;
            let unnamed = header.get(positional).map(|name| name.is_empty()).unwrap_or(true);
            if col.is_none() && unnamed && !claimed.get(positional).copied().unwrap_or(false) {
                if let Some(slot) = claimed.get_mut(positional) {
                    *slot = true;
                }
                *col = Some(positional);
            }
        }
        columns
    }
}

/// Grid row holding each canonical category, if any
fn resolve_rows(grid: &Grid) -> Vec<Option<usize>> {
    let mut rows: Vec<Option<usize>> = vec![None; CATEGORY_COUNT];
    let mut unlabeled = Vec::new();

    for (r, cells) in grid.iter().enumerate().skip(1) {
        let label = cells.first().map(|c| c.value.as_text()).unwrap_or_default();
        match category_index(&label) {
            Some(idx) if rows[idx].is_none() => rows[idx] = Some(r),
            Some(_) => {}
            None => unlabeled.push(r),
        }
    }

    for r in unlabeled {
        if let Some(slot) = rows.get_mut(r - 1) {
            if slot.is_none() {
                *slot = Some(r);
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![Participant::new("u2", "Bea"), Participant::new("u1", "Al")]
    }

    #[test]
    fn test_canonical_shape() {
        let scoring = CATEGORIES.iter().filter(|c| c.kind == CategoryKind::Scoring).count();
        assert_eq!(CATEGORY_COUNT, 21);
        assert_eq!(scoring, 18);
        assert_eq!(SHEET_HEIGHT, 22);

        let sheet = RubricSheet::new(&roster());
        let grid = sheet.to_grid();
        assert_eq!(grid.len(), 22);
        assert!(grid.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_columns_follow_name_order() {
        let sheet = RubricSheet::new(&roster());
        let grid = sheet.to_grid();
        assert_eq!(grid[0][0].value, CellValue::Text("Category".into()));
        assert_eq!(grid[0][1].value, CellValue::Text("Importance".into()));
        assert_eq!(grid[0][2].value, CellValue::Text("Al".into()));
        assert_eq!(grid[0][3].value, CellValue::Text("Bea".into()));
    }

    #[test]
    fn test_separator_rows_are_blank_and_read_only() {
        let sheet = RubricSheet::new(&roster());
        let grid = sheet.to_grid();
        for name in ["Input", "Execution", "Intangibles"] {
            let row = category_index(name).unwrap() + 1;
            assert!(is_separator_row(row));
            assert_eq!(grid[row][0].value, CellValue::Text(name.into()));
            for cell in &grid[row] {
                assert!(cell.read_only);
            }
            for cell in &grid[row][1..] {
                assert_eq!(cell.value, CellValue::Text(String::new()));
            }
        }
    }

    #[test]
    fn test_derived_roles() {
        assert_eq!(cell_role(0, 3, 4), Some(CellRole::Header));
        assert_eq!(cell_role(2, 0, 4), Some(CellRole::CategoryLabel));
        assert_eq!(cell_role(2, 1, 4), Some(CellRole::Importance));
        assert_eq!(cell_role(2, 3, 4), Some(CellRole::Score));
        assert_eq!(cell_role(1, 2, 4), Some(CellRole::SeparatorBlank));
        assert_eq!(cell_role(2, 4, 4), None);
        assert_eq!(cell_role(22, 1, 4), None);
        assert!(is_editable(2, 1, 4));
        assert!(!is_editable(0, 1, 4));
        assert!(!is_editable(8, 2, 4));
    }

    #[test]
    fn test_parse_cell_input() {
        assert_eq!(parse_cell_input(None), Ok(0));
        assert_eq!(parse_cell_input(Some("")), Ok(0));
        assert_eq!(parse_cell_input(Some(" 42 ")), Ok(42));
        assert_eq!(parse_cell_input(Some("100")), Ok(100));
        assert_eq!(parse_cell_input(Some("12.0")), Err(CellInputError::NotInteger));
        assert_eq!(parse_cell_input(Some("abc")), Err(CellInputError::NotInteger));
        assert_eq!(parse_cell_input(Some("150")), Err(CellInputError::OutOfRange(150)));
        assert_eq!(parse_cell_input(Some("-1")), Err(CellInputError::OutOfRange(-1)));
    }

    #[test]
    fn test_invalid_edit_keeps_previous_value() {
        let mut sheet = RubricSheet::new(&roster());
        let row = category_index("Sales").unwrap() + 1;

        assert_eq!(sheet.apply_edit(row, 1, Some("40")).unwrap(), EditOutcome::Accepted(40));
        assert_eq!(sheet.apply_edit(row, 1, Some("150")).unwrap(), EditOutcome::Kept(40));
        assert_eq!(sheet.apply_edit(row, 1, Some("39.5")).unwrap(), EditOutcome::Kept(40));
        assert_eq!(sheet.value_at(row, 1), Some(40));

        assert_eq!(sheet.apply_edit(row, 2, Some("70")).unwrap(), EditOutcome::Accepted(70));
        assert_eq!(sheet.apply_edit(row, 2, Some("-5")).unwrap(), EditOutcome::Kept(70));
        assert_eq!(sheet.apply_edit(row, 2, None).unwrap(), EditOutcome::Accepted(0));
    }

    #[test]
    fn test_edit_rejects_read_only_cells() {
        let mut sheet = RubricSheet::new(&roster());
        assert!(sheet.apply_edit(0, 2, Some("1")).is_err());
        assert!(sheet.apply_edit(1, 1, Some("1")).is_err());
        assert!(sheet.apply_edit(3, 0, Some("1")).is_err());
        assert!(sheet.apply_edit(3, 9, Some("1")).is_err());
    }

    #[test]
    fn test_grid_round_trip() {
        let mut sheet = RubricSheet::new(&roster());
        sheet.set_importance("Idea", 30).unwrap();
        sheet.set_score("Idea", 0, 80).unwrap();
        sheet.set_score("Idea", 1, 20).unwrap();

        let rebuilt = RubricSheet::from_grid(&sheet.to_grid(), &roster());
        assert_eq!(rebuilt, sheet);
    }

    #[test]
    fn test_from_grid_pads_missing_participant_column() {
        let solo = vec![Participant::new("u1", "Al")];
        let mut old = RubricSheet::new(&solo);
        old.set_importance("Vision", 50).unwrap();
        old.set_score("Vision", 0, 90).unwrap();

        let sheet = RubricSheet::from_grid(&old.to_grid(), &roster());
        let vision = category_index("Vision").unwrap();
        assert_eq!(sheet.participant_count(), 2);
        assert_eq!(sheet.importance(vision), 50);
        assert_eq!(sheet.score(vision, 0), 90);
        assert_eq!(sheet.score(vision, 1), 0);
    }

    #[test]
    fn test_from_grid_matches_renamed_column_order() {
        // Persisted with Bea first; columns should still land on the right person
        let grid: Grid = vec![
            vec![Cell::text("Category"), Cell::text("Importance"), Cell::text("Bea"), Cell::text("Al")],
            vec![Cell::text("Idea"), Cell::number(10), Cell::number(5), Cell::number(7)],
        ];
        let sheet = RubricSheet::from_grid(&grid, &roster());
        let idea = category_index("Idea").unwrap();
        assert_eq!(sheet.score(idea, 0), 7);
        assert_eq!(sheet.score(idea, 1), 5);
        assert_eq!(sheet.importance(idea), 10);
    }

    #[test]
    fn test_from_grid_keeps_duplicate_names_apart() {
        let twins = vec![Participant::new("u1", "Sam"), Participant::new("u2", "Sam")];
        let mut sheet = RubricSheet::new(&twins);
        sheet.set_importance("Idea", 100).unwrap();
        sheet.set_score("Idea", 0, 80).unwrap();
        sheet.set_score("Idea", 1, 20).unwrap();

        let rebuilt = RubricSheet::from_grid(&sheet.to_grid(), &twins);

        let idea = category_index("Idea").unwrap();
        assert_eq!(rebuilt.score(idea, 0), 80);
        assert_eq!(rebuilt.score(idea, 1), 20);
        assert_eq!(rebuilt, sheet);
    }

    #[test]
    fn test_from_grid_new_member_does_not_inherit_leaver_column() {
        let mut old = RubricSheet::new(&roster());
        old.set_importance("Idea", 50).unwrap();
        old.set_score("Idea", 0, 10).unwrap();
        old.set_score("Idea", 1, 90).unwrap();

        // Bea left, Cy joined in the same column position
        let current = vec![Participant::new("u1", "Al"), Participant::new("u3", "Cy")];
        let sheet = RubricSheet::from_grid(&old.to_grid(), &current);

        let idea = category_index("Idea").unwrap();
        assert_eq!(sheet.score(idea, 0), 10);
        assert_eq!(sheet.score(idea, 1), 0);
    }

    #[test]
    fn test_from_grid_positional_fallback_for_unnamed_columns() {
        let grid: Grid = vec![
            vec![Cell::text("Category"), Cell::text("Importance"), Cell::text(""), Cell::text("")],
            vec![Cell::text("Idea"), Cell::number(10), Cell::number(5), Cell::number(7)],
        ];
        let sheet = RubricSheet::from_grid(&grid, &roster());
        let idea = category_index("Idea").unwrap();
        assert_eq!(sheet.score(idea, 0), 5);
        assert_eq!(sheet.score(idea, 1), 7);
    }

    #[test]
    fn test_grid_roles_match_position() {
        let sheet = RubricSheet::new(&roster());
        let grid = sheet.to_grid();
        let width = sheet.width();
        for (row, cells) in grid.iter().enumerate() {
            assert_eq!(cells.len(), width);
            for (col, cell) in cells.iter().enumerate() {
                let role = cell_role(row, col, width).unwrap();
                assert_eq!(cell.class_name.as_deref(), Some(role.class_name()), "({row}, {col})");
                assert_eq!(cell.read_only, !role.is_editable(), "({row}, {col})");
            }
        }
    }

    #[test]
    fn test_lenient_cell_values() {
        assert_eq!(CellValue::Text("55".into()).as_score(), 55);
        assert_eq!(CellValue::Text("".into()).as_score(), 0);
        assert_eq!(CellValue::Null.as_score(), 0);
        assert_eq!(CellValue::Float(20.0).as_score(), 20);
        assert_eq!(CellValue::Float(20.5).as_score(), 0);
        assert_eq!(CellValue::Int(101).as_score(), 0);
    }

    #[test]
    fn test_cell_serializes_in_persisted_shape() {
        let cell = Cell::number(5).with_role(CellRole::Score);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "value": 5, "readOnly": false, "className": "score-cell" })
        );

        let parsed: Cell = serde_json::from_value(serde_json::json!({ "value": null })).unwrap();
        assert_eq!(parsed.value, CellValue::Null);
        assert!(!parsed.read_only);
    }
}
