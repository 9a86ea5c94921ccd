use crate::coord::{CellPos, CellRange};
use crate::domain::ReportMonth;
use crate::error::{Result, ResultExt};
use crate::registry::{CellRef, Handler, PassContext, PassKind};

pub const DAYS_PLACEHOLDER: &str = "{{days}}";

const DAY_COLUMN_WIDTH: f64 = 4.0;
const HEADER_ROWS: u32 = 2;

/// Expands `{{days}}` into one numbered column per day of the month.
///
/// The two rows above the placeholder are merged across the new span and
/// keep the style of their left-most cell.
#[derive(Debug, Clone)]
pub struct DaysHandler {
    days: u32,
}

impl DaysHandler {
    pub fn new(month: ReportMonth) -> Self {
        Self::with_days(month.days())
    }

    pub fn with_days(days: u32) -> Self {
        Self { days: days.max(1) }
    }
}

impl Handler for DaysHandler {
    fn kind(&self) -> PassKind {
        PassKind::Structural
    }

    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        let sheet = cell.sheet;
        let CellPos { row, col } = cell.pos;
        let last_col = col + self.days - 1;

        ctx.insert_cols(sheet, col + 1, self.days - 1)
            .context(|| "insert day columns")?;

        for header_row in row.saturating_sub(HEADER_ROWS)..row {
            let span = CellRange::row_span(header_row, col, last_col);
            let style = ctx.book.cell_style(sheet, span.start)?;

            ctx.book
                .merge(sheet, span)
                .context(|| format!("merge header row {}", header_row + 1))?;

            if let Some(style) = style {
                ctx.book.set_style(sheet, span, style)?;
            }
        }

        let style = ctx.book.cell_style(sheet, cell.pos)?;

        for day in 0..self.days {
            ctx.book
                .set_int(sheet, CellPos::new(row, col + day), day as i64 + 1)
                .context(|| format!("set day {}", day + 1))?;
        }

        if let Some(style) = style {
            ctx.book
                .set_style(sheet, CellRange::row_span(row, col, last_col), style)
                .context(|| "copy day style")?;
        }

        ctx.book
            .set_col_width(sheet, col, last_col, DAY_COLUMN_WIDTH)
            .context(|| "set day column width")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::cell_name;
    use crate::processor::Pipeline;
    use crate::registry::Registry;
    use crate::workbook::{UmyaWorkbook, Workbook};
    use rstest::rstest;

    const SHEET: &str = "Sheet1";

    fn template() -> UmyaWorkbook {
        let mut book = UmyaWorkbook::new();
        book.set_text(SHEET, CellPos::new(0, 2), "Days of month").unwrap();
        book.set_text(SHEET, CellPos::new(1, 2), "Attendance").unwrap();
        book.set_text(SHEET, CellPos::new(2, 1), "Name").unwrap();
        book.set_text(SHEET, CellPos::new(2, 2), DAYS_PLACEHOLDER).unwrap();
        book.set_text(SHEET, CellPos::new(2, 3), "Total").unwrap();
        book
    }

    fn expand(book: UmyaWorkbook, days: u32) -> UmyaWorkbook {
        let mut registry = Registry::structural();
        registry.register(DAYS_PLACEHOLDER, DaysHandler::with_days(days)).unwrap();

        let mut pipeline = Pipeline::new(book);
        pipeline.run(registry).unwrap();
        pipeline.into_book()
    }

    #[rstest]
    #[case(28)]
    #[case(29)]
    #[case(30)]
    #[case(31)]
    fn test_expands_one_column_per_day(#[case] days: u32) {
        let book = expand(template(), days);

        let rows = book.rows(SHEET).unwrap();
        let day_cells: Vec<String> = rows[2][2..2 + days as usize].to_vec();
        let expected: Vec<String> = (1..=days).map(|d| d.to_string()).collect();
        assert_eq!(day_cells, expected);

        // D-1 inserted columns push "Total" right by D-1
        assert_eq!(rows[2][1], "Name");
        assert_eq!(rows[2][2 + days as usize], "Total");
        assert_eq!(rows[2].len(), 3 + days as usize);
    }

    #[test]
    fn test_header_rows_are_merged_across_span() {
        let book = expand(template(), 30);

        let merged = book.merged_ranges(SHEET).unwrap();
        let last = cell_name(0, 31);
        assert!(merged.contains(&CellRange::parse(&format!("C1:{}", last)).unwrap()));
        assert!(merged.contains(&CellRange::parse("C2:AF2").unwrap()));
        assert_eq!(book.cell_text(SHEET, CellPos::new(0, 2)).unwrap(), "Days of month");
    }

    #[test]
    fn test_styles_span_the_new_columns() {
        let mut book = template();
        let heading = book.heading_style();
        book.set_style(SHEET, CellRange::parse("C1").unwrap(), heading).unwrap();
        book.set_style(SHEET, CellRange::parse("C3").unwrap(), heading).unwrap();

        let book = expand(book, 30);

        for col in [2, 17, 31] {
            // day numbers keep the placeholder style
            assert_eq!(book.font_of(SHEET, CellPos::new(2, col)), Some((true, 14.0)));
            // the merged header row keeps the style of its first cell
            assert_eq!(book.font_of(SHEET, CellPos::new(0, col)), Some((true, 14.0)));
        }
        assert_ne!(book.font_of(SHEET, CellPos::new(2, 32)), Some((true, 14.0)));
    }

    #[test]
    fn test_day_columns_are_narrow() {
        let book = expand(template(), 31);

        for col in 2..33 {
            assert_eq!(book.col_width(SHEET, col), Some(DAY_COLUMN_WIDTH), "column {}", col);
        }
        assert_ne!(book.col_width(SHEET, 1), Some(DAY_COLUMN_WIDTH));
        assert_ne!(book.col_width(SHEET, 33), Some(DAY_COLUMN_WIDTH));
    }

    #[test]
    fn test_single_day_inserts_nothing() {
        let book = expand(template(), 1);

        let rows = book.rows(SHEET).unwrap();
        assert_eq!(rows[2], vec!["", "Name", "1", "Total"]);
        assert!(book.merged_ranges(SHEET).unwrap().is_empty());
    }

    #[test]
    fn test_placeholder_on_first_row_has_no_headers() {
        let mut book = UmyaWorkbook::new();
        book.set_text(SHEET, CellPos::new(0, 0), DAYS_PLACEHOLDER).unwrap();

        let book = expand(book, 3);
        assert_eq!(book.rows(SHEET).unwrap(), vec![vec!["1", "2", "3"]]);
    }
}
