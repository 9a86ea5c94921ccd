//! 0-based cell coordinates and their A1-style labels.

use std::fmt;

use crate::error::{Error, Result};

/// A 0-based (row, col) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn label(&self) -> String {
        cell_name(self.row, self.col)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// An inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellPos,
    pub end: CellPos,
}

impl CellRange {
    /// Build the rectangle spanned by two corners, in any order.
    pub fn new(a: CellPos, b: CellPos) -> Self {
        Self {
            start: CellPos::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellPos::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn single(pos: CellPos) -> Self {
        Self { start: pos, end: pos }
    }

    /// Cells of one row from `first_col` to `last_col`.
    pub fn row_span(row: u32, first_col: u32, last_col: u32) -> Self {
        Self::new(CellPos::new(row, first_col), CellPos::new(row, last_col))
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| (self.start.col..=self.end.col).map(move |col| CellPos::new(row, col)))
    }

    /// Parse `"B2:D4"` or a single `"B2"`.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once(':') {
            Some((a, b)) => Ok(Self::new(parse_cell(a)?, parse_cell(b)?)),
            None => Ok(Self::single(parse_cell(text)?)),
        }
    }
}

impl From<CellPos> for CellRange {
    fn from(pos: CellPos) -> Self {
        Self::single(pos)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Convert a 0-based column index to letters (0 → A, 25 → Z, 26 → AA).
pub fn column_name(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Convert 0-based row and column indices to a cell label (0, 0 → "A1").
pub fn cell_name(row: u32, col: u32) -> String {
    format!("{}{}", column_name(col), row as u64 + 1)
}

/// Parse A1 notation (e.g. "A1", "bc123", "$C$7") into a 0-based position.
pub fn parse_cell(cell: &str) -> Result<CellPos> {
    let cell = cell.trim().replace('$', "").to_uppercase();
    let invalid = || Error::InvalidReference(cell.clone());

    // Find where letters end and digits begin
    let col_end = cell
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .ok_or_else(invalid)?;

    let col_str = &cell[..col_end];
    let row_str = &cell[col_end..];

    if col_str.is_empty() || !col_str.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(invalid());
    }

    let col: u64 = col_str
        .chars()
        .fold(0, |acc, c| acc * 26 + (c as u64 - 'A' as u64 + 1));

    let row: u64 = row_str.parse().map_err(|_| invalid())?;
    if row == 0 || col > u32::MAX as u64 || row > u32::MAX as u64 {
        return Err(invalid());
    }

    Ok(CellPos::new(row as u32 - 1, col as u32 - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cell_name() {
        assert_eq!(cell_name(0, 0), "A1");
        assert_eq!(cell_name(1, 1), "B2");
        assert_eq!(cell_name(0, 25), "Z1");
        assert_eq!(cell_name(0, 26), "AA1");
        assert_eq!(cell_name(9, 27), "AB10");
        assert_eq!(column_name(16_383), "XFD");
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("A1").unwrap(), CellPos::new(0, 0));
        assert_eq!(parse_cell("ab10").unwrap(), CellPos::new(9, 27));
        assert_eq!(parse_cell("$C$7").unwrap(), CellPos::new(6, 2));
        assert!(parse_cell("A0").is_err());
        assert!(parse_cell("12").is_err());
        assert!(parse_cell("A").is_err());
    }

    #[test]
    fn test_range_parse_normalizes_corners() {
        let range = CellRange::parse("D4:B2").unwrap();
        assert_eq!(range.start, CellPos::new(1, 1));
        assert_eq!(range.end, CellPos::new(3, 3));
        assert_eq!(range.to_string(), "B2:D4");
        assert_eq!(range.positions().count(), 9);
    }

    proptest! {
        #[test]
        fn prop_label_parses_back(row in 0u32..1_048_576, col in 0u32..16_384) {
            prop_assert_eq!(parse_cell(&cell_name(row, col)).unwrap(), CellPos::new(row, col));
        }
    }
}
