//! Employee blocks written by one pass and read by later ones.

use std::ops::Range;

use crate::coord::{CellPos, CellRange};

/// Rows written by the employee handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeBlock {
    pub sheet: String,
    pub first_row: u32,
    pub count: u32,
    /// First attendance column.
    pub attendance_col: u32,
    /// Number of attendance columns.
    pub days: u32,
}

impl EmployeeBlock {
    pub fn rows(&self) -> Range<u32> {
        self.first_row..self.end_row()
    }

    /// One past the last employee row.
    pub fn end_row(&self) -> u32 {
        self.first_row + self.count
    }

    pub fn attendance_range(&self, row: u32) -> CellRange {
        CellRange::new(
            CellPos::new(row, self.attendance_col),
            CellPos::new(row, self.attendance_col + self.days.max(1) - 1),
        )
    }
}

/// Keeps recorded blocks in step with structural edits made after they were written.
#[derive(Debug, Default)]
pub struct BlockLedger {
    blocks: Vec<EmployeeBlock>,
}

impl BlockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, block: EmployeeBlock) {
        log::debug!(
            "employee block on \"{}\": rows {}..{}, attendance from column {}",
            block.sheet,
            block.first_row + 1,
            block.end_row(),
            block.attendance_col + 1
        );
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[EmployeeBlock] {
        &self.blocks
    }

    /// The closest block on `sheet` that ends at or above `row`.
    pub fn nearest_above(&self, sheet: &str, row: u32) -> Option<&EmployeeBlock> {
        self.blocks
            .iter()
            .filter(|b| b.sheet == sheet && b.end_row() <= row)
            .max_by_key(|b| b.end_row())
    }

    pub fn rows_inserted(&mut self, sheet: &str, at: u32, count: u32) {
        for block in self.on_sheet(sheet) {
            if at <= block.first_row {
                block.first_row += count;
            } else if at < block.end_row() {
                block.count += count;
            }
        }
    }

    /// A block whose every row is removed is dropped. An empty block (no
    /// employees) stays, so a summary cell below it still finds it.
    pub fn rows_removed(&mut self, sheet: &str, at: u32, count: u32) {
        let removed_end = at + count;
        self.blocks.retain_mut(|block| {
            if block.sheet != sheet {
                return true;
            }
            let overlap = removed_end
                .min(block.end_row())
                .saturating_sub(at.max(block.first_row));
            let before = removed_end.min(block.first_row).saturating_sub(at);
            block.first_row -= before;
            block.count -= overlap;
            overlap == 0 || block.count > 0
        });
    }

    pub fn cols_inserted(&mut self, sheet: &str, at: u32, count: u32) {
        for block in self.on_sheet(sheet) {
            if at <= block.attendance_col {
                block.attendance_col += count;
            }
        }
    }

    pub fn cols_removed(&mut self, sheet: &str, at: u32, count: u32) {
        for block in self.on_sheet(sheet) {
            let before = (at + count).min(block.attendance_col).saturating_sub(at);
            block.attendance_col -= before;
        }
    }

    fn on_sheet<'a>(&'a mut self, sheet: &'a str) -> impl Iterator<Item = &'a mut EmployeeBlock> + 'a {
        self.blocks.iter_mut().filter(move |b| b.sheet == sheet)
    }
}
