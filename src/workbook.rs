//! The spreadsheet engine seen by handlers.
//!
//! Handlers only talk to [`Workbook`]; [`UmyaWorkbook`] implements it on top of
//! `umya_spreadsheet`. All coordinates are 0-based.

use std::path::Path;

use umya_spreadsheet::structs::{
    Border, HorizontalAlignmentValues, Style, VerticalAlignmentValues, Worksheet,
};
use umya_spreadsheet::Spreadsheet;

use crate::coord::{CellPos, CellRange};
use crate::error::{Error, Result};
use crate::{reader, writer};

/// Maximum number of rows in an Excel worksheet.
pub const MAX_ROWS: u32 = 1_048_576;
/// Maximum number of columns in an Excel worksheet.
pub const MAX_COLS: u32 = 16_384;

/// Opaque handle to a style allocated by a [`Workbook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    General,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Description of a style to allocate.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub font_name: String,
    pub font_size: f64,
    pub bold: bool,
    pub horizontal: HAlign,
    pub vertical: VAlign,
    /// Thin black border on all four sides.
    pub bordered: bool,
}

pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    /// All rows of a sheet as text, trailing empty cells trimmed.
    fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>>;

    fn cell_text(&self, sheet: &str, pos: CellPos) -> Result<String>;
    fn formula(&self, sheet: &str, pos: CellPos) -> Result<Option<String>>;

    fn set_text(&mut self, sheet: &str, pos: CellPos, value: &str) -> Result<()>;
    fn set_int(&mut self, sheet: &str, pos: CellPos, value: i64) -> Result<()>;
    /// `formula` is written without the leading `=`.
    fn set_formula(&mut self, sheet: &str, pos: CellPos, formula: &str) -> Result<()>;
    /// Remove the value and formula of a cell, keeping its style.
    fn clear_cell(&mut self, sheet: &str, pos: CellPos) -> Result<()>;

    fn new_style(&mut self, spec: &StyleSpec) -> Result<StyleId>;
    /// The style of an existing cell, or `None` if the cell does not exist.
    fn cell_style(&mut self, sheet: &str, pos: CellPos) -> Result<Option<StyleId>>;
    fn set_style(&mut self, sheet: &str, range: CellRange, style: StyleId) -> Result<()>;
    /// Add thin borders to every cell in the range, keeping the rest of each style.
    fn outline_range(&mut self, sheet: &str, range: CellRange) -> Result<()>;

    fn insert_rows(&mut self, sheet: &str, at_row: u32, count: u32) -> Result<()>;
    fn remove_rows(&mut self, sheet: &str, at_row: u32, count: u32) -> Result<()>;
    fn insert_cols(&mut self, sheet: &str, at_col: u32, count: u32) -> Result<()>;
    fn remove_cols(&mut self, sheet: &str, at_col: u32, count: u32) -> Result<()>;

    fn merge(&mut self, sheet: &str, range: CellRange) -> Result<()>;
    /// Drop a merged range; its cells keep their values and styles.
    fn unmerge(&mut self, sheet: &str, range: CellRange) -> Result<()>;
    fn merged_ranges(&self, sheet: &str) -> Result<Vec<CellRange>>;

    fn set_col_width(&mut self, sheet: &str, first_col: u32, last_col: u32, width: f64) -> Result<()>;
}

/// [`Workbook`] backed by an in-memory `umya_spreadsheet::Spreadsheet`.
#[derive(Debug)]
pub struct UmyaWorkbook {
    book: Spreadsheet,
    styles: Vec<Style>,
}

impl Default for UmyaWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl UmyaWorkbook {
    /// A new workbook with a single empty `Sheet1`.
    pub fn new() -> Self {
        Self::from_spreadsheet(umya_spreadsheet::new_file())
    }

    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self {
            book,
            styles: Vec::new(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        reader::open_template(path).map(Self::from_spreadsheet)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        reader::read_bytes(bytes).map(Self::from_spreadsheet)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        writer::to_bytes(&self.book)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        writer::save(&self.book, path)
    }

    pub fn add_sheet(&mut self, name: &str) -> Result<()> {
        self.book
            .new_sheet(name)
            .map(|_| ())
            .map_err(|e| Error::Structural {
                op: "add sheet",
                details: e.to_string(),
            })
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }

    /// Number of style handles issued so far.
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    fn sheet(&self, name: &str) -> Result<&Worksheet> {
        self.book
            .get_sheet_by_name(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))
    }

    fn style(&self, id: StyleId) -> Result<&Style> {
        self.styles
            .get(id.0 as usize)
            .ok_or(Error::UnknownStyle(id.0))
    }

    fn issue(&mut self, style: Style) -> StyleId {
        self.styles.push(style);
        StyleId(self.styles.len() as u32 - 1)
    }
}

/// umya addresses cells as 1-based (col, row).
fn umya_coord(pos: CellPos) -> (u32, u32) {
    (pos.col + 1, pos.row + 1)
}

fn check_pos(pos: CellPos) -> Result<()> {
    if pos.row >= MAX_ROWS || pos.col >= MAX_COLS {
        return Err(Error::InvalidReference(format!(
            "row {} col {} is outside the sheet",
            pos.row, pos.col
        )));
    }
    Ok(())
}

fn check_range(range: CellRange) -> Result<()> {
    check_pos(range.start)?;
    check_pos(range.end)
}

fn build_style(spec: &StyleSpec) -> Style {
    let mut style = Style::default();

    let font = style.get_font_mut();
    font.set_name(spec.font_name.clone());
    font.set_size(spec.font_size);
    font.set_bold(spec.bold);

    let alignment = style.get_alignment_mut();
    alignment.set_horizontal(match spec.horizontal {
        HAlign::General => HorizontalAlignmentValues::General,
        HAlign::Left => HorizontalAlignmentValues::Left,
        HAlign::Center => HorizontalAlignmentValues::Center,
        HAlign::Right => HorizontalAlignmentValues::Right,
    });
    alignment.set_vertical(match spec.vertical {
        VAlign::Top => VerticalAlignmentValues::Top,
        VAlign::Center => VerticalAlignmentValues::Center,
        VAlign::Bottom => VerticalAlignmentValues::Bottom,
    });

    if spec.bordered {
        add_thin_borders(&mut style);
    }

    style
}

fn add_thin_borders(style: &mut Style) {
    let borders = style.get_borders_mut();
    set_thin(borders.get_left_mut());
    set_thin(borders.get_right_mut());
    set_thin(borders.get_top_mut());
    set_thin(borders.get_bottom_mut());
}

fn set_thin(border: &mut Border) {
    border.set_border_style(Border::BORDER_THIN);
    border.get_color_mut().set_argb("FF000000");
}

impl Workbook for UmyaWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection_no_check()
            .iter()
            .map(|sheet| sheet.get_name().to_string())
            .collect()
    }

    fn rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let ws = self.sheet(sheet)?;
        let (max_col, max_row) = ws.get_highest_column_and_row();

        let mut rows = Vec::with_capacity(max_row as usize);
        for row in 1..=max_row {
            let mut record: Vec<String> = (1..=max_col)
                .map(|col| {
                    ws.get_cell((col, row))
                        .map(|cell| cell.get_value().to_string())
                        .unwrap_or_default()
                })
                .collect();

            while record.last().is_some_and(|value| value.is_empty()) {
                record.pop();
            }
            rows.push(record);
        }

        Ok(rows)
    }

    fn cell_text(&self, sheet: &str, pos: CellPos) -> Result<String> {
        check_pos(pos)?;
        Ok(self
            .sheet(sheet)?
            .get_cell(umya_coord(pos))
            .map(|cell| cell.get_value().to_string())
            .unwrap_or_default())
    }

    fn formula(&self, sheet: &str, pos: CellPos) -> Result<Option<String>> {
        check_pos(pos)?;
        Ok(self
            .sheet(sheet)?
            .get_cell(umya_coord(pos))
            .map(|cell| cell.get_formula().to_string())
            .filter(|formula| !formula.is_empty()))
    }

    fn set_text(&mut self, sheet: &str, pos: CellPos, value: &str) -> Result<()> {
        check_pos(pos)?;
        self.sheet_mut(sheet)?
            .get_cell_mut(umya_coord(pos))
            .set_value_string(value);
        Ok(())
    }

    fn set_int(&mut self, sheet: &str, pos: CellPos, value: i64) -> Result<()> {
        check_pos(pos)?;
        self.sheet_mut(sheet)?
            .get_cell_mut(umya_coord(pos))
            .set_value_number(value as f64);
        Ok(())
    }

    fn set_formula(&mut self, sheet: &str, pos: CellPos, formula: &str) -> Result<()> {
        check_pos(pos)?;
        self.sheet_mut(sheet)?
            .get_cell_mut(umya_coord(pos))
            .set_formula(formula);
        Ok(())
    }

    fn clear_cell(&mut self, sheet: &str, pos: CellPos) -> Result<()> {
        check_pos(pos)?;
        let ws = self.sheet_mut(sheet)?;
        if ws.get_cell(umya_coord(pos)).is_none() {
            return Ok(());
        }
        let cell = ws.get_cell_mut(umya_coord(pos));
        cell.set_value_string("");
        cell.get_cell_value_mut().remove_formula();
        Ok(())
    }

    fn new_style(&mut self, spec: &StyleSpec) -> Result<StyleId> {
        Ok(self.issue(build_style(spec)))
    }

    fn cell_style(&mut self, sheet: &str, pos: CellPos) -> Result<Option<StyleId>> {
        check_pos(pos)?;
        let style = self
            .sheet(sheet)?
            .get_cell(umya_coord(pos))
            .map(|cell| cell.get_style().clone());
        Ok(style.map(|style| self.issue(style)))
    }

    fn set_style(&mut self, sheet: &str, range: CellRange, style: StyleId) -> Result<()> {
        check_range(range)?;
        let style = self.style(style)?.clone();
        let ws = self.sheet_mut(sheet)?;
        for pos in range.positions() {
            ws.get_cell_mut(umya_coord(pos)).set_style(style.clone());
        }
        Ok(())
    }

    fn outline_range(&mut self, sheet: &str, range: CellRange) -> Result<()> {
        check_range(range)?;
        let ws = self.sheet_mut(sheet)?;
        for pos in range.positions() {
            add_thin_borders(ws.get_cell_mut(umya_coord(pos)).get_style_mut());
        }
        Ok(())
    }

    fn insert_rows(&mut self, sheet: &str, at_row: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let ws = self.sheet_mut(sheet)?;
        let (_, highest_row) = ws.get_highest_column_and_row();
        let last = highest_row.max(at_row + 1) as u64 + count as u64;
        if last > MAX_ROWS as u64 {
            return Err(Error::Structural {
                op: "insert rows",
                details: format!("{} rows at row {} would exceed {} rows", count, at_row + 1, MAX_ROWS),
            });
        }
        ws.insert_new_row(&(at_row + 1), &count);
        Ok(())
    }

    fn remove_rows(&mut self, sheet: &str, at_row: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        if at_row as u64 + count as u64 > MAX_ROWS as u64 {
            return Err(Error::Structural {
                op: "remove rows",
                details: format!("rows {}..{} are outside the sheet", at_row + 1, at_row as u64 + count as u64),
            });
        }
        self.sheet_mut(sheet)?.remove_row(&(at_row + 1), &count);
        Ok(())
    }

    fn insert_cols(&mut self, sheet: &str, at_col: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let ws = self.sheet_mut(sheet)?;
        let (highest_col, _) = ws.get_highest_column_and_row();
        let last = highest_col.max(at_col + 1) as u64 + count as u64;
        if last > MAX_COLS as u64 {
            return Err(Error::Structural {
                op: "insert columns",
                details: format!(
                    "{} columns at column {} would exceed {} columns",
                    count,
                    at_col + 1,
                    MAX_COLS
                ),
            });
        }
        ws.insert_new_column_by_index(&(at_col + 1), &count);
        Ok(())
    }

    fn remove_cols(&mut self, sheet: &str, at_col: u32, count: u32) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        if at_col as u64 + count as u64 > MAX_COLS as u64 {
            return Err(Error::Structural {
                op: "remove columns",
                details: format!("columns starting at {} are outside the sheet", at_col + 1),
            });
        }
        self.sheet_mut(sheet)?.remove_column_by_index(&(at_col + 1), &count);
        Ok(())
    }

    fn merge(&mut self, sheet: &str, range: CellRange) -> Result<()> {
        check_range(range)?;
        if range.is_single() {
            return Ok(());
        }
        self.sheet_mut(sheet)?.add_merge_cells(range.to_string());
        Ok(())
    }

    fn unmerge(&mut self, sheet: &str, range: CellRange) -> Result<()> {
        self.sheet_mut(sheet)?
            .get_merge_cells_mut()
            .retain(|merged| CellRange::parse(&merged.get_range()).ok() != Some(range));
        Ok(())
    }

    fn merged_ranges(&self, sheet: &str) -> Result<Vec<CellRange>> {
        Ok(self
            .sheet(sheet)?
            .get_merge_cells()
            .iter()
            .filter_map(|range| CellRange::parse(&range.get_range()).ok())
            .collect())
    }

    fn set_col_width(&mut self, sheet: &str, first_col: u32, last_col: u32, width: f64) -> Result<()> {
        if last_col >= MAX_COLS {
            return Err(Error::InvalidReference(format!("column {} is outside the sheet", last_col)));
        }
        let ws = self.sheet_mut(sheet)?;
        for col in first_col..=last_col {
            ws.get_column_dimension_by_number_mut(&(col + 1)).set_width(width);
        }
        Ok(())
    }
}

#[cfg(test)]
impl UmyaWorkbook {
    /// Bold flag and size of an existing cell's font.
    pub(crate) fn font_of(&self, sheet: &str, pos: CellPos) -> Option<(bool, f64)> {
        let cell = self.book.get_sheet_by_name(sheet)?.get_cell(umya_coord(pos))?;
        let font = cell.get_style().get_font()?;
        Some((*font.get_bold(), *font.get_size()))
    }

    pub(crate) fn col_width(&self, sheet: &str, col: u32) -> Option<f64> {
        self.book
            .get_sheet_by_name(sheet)?
            .get_column_dimension_by_number(&(col + 1))
            .map(|column| *column.get_width())
    }

    /// A bold 14pt style, distinct from every role style.
    pub(crate) fn heading_style(&mut self) -> StyleId {
        self.issue(build_style(&StyleSpec {
            font_name: "Arial".to_string(),
            font_size: 14.0,
            bold: true,
            horizontal: HAlign::Left,
            vertical: VAlign::Top,
            bordered: false,
        }))
    }
}
