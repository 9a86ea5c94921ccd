mod common;

use common::evaluate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sheetfill::coord::CellPos;
use sheetfill::handlers::formula::default_keys;
use sheetfill::handlers::{FormulaHandler, RowSource};
use sheetfill::{Pipeline, Registry, UmyaWorkbook, Workbook};

const SHEET: &str = "Sheet1";

/// Attendance in B1 onwards, the summary placeholder in A2. Returns what A1
/// displays after the formula pass.
fn summary(attendance: &[&str], placeholder: &str) -> String {
    let mut book = UmyaWorkbook::new();
    for (i, symbol) in attendance.iter().enumerate() {
        book.set_text(SHEET, CellPos::new(0, 1 + i as u32), symbol).unwrap();
    }
    book.set_text(SHEET, CellPos::new(1, 0), placeholder).unwrap();

    let handler = FormulaHandler::new(default_keys()).with_rows(RowSource::Fixed {
        count: 1,
        attendance_col: 1,
        days: attendance.len() as u32,
    });
    let mut registry = Registry::stable();
    handler.register(&mut registry).unwrap();
    let mut pipeline = Pipeline::new(book);
    pipeline.run(registry).unwrap();

    let book = pipeline.into_book();
    assert!(book.formula(SHEET, CellPos::new(0, 0)).unwrap().is_some());
    assert_eq!(book.cell_text(SHEET, CellPos::new(1, 0)).unwrap(), "");

    evaluate(&book).shown(SHEET, CellPos::new(0, 0))
}

#[rstest]
#[case("{{t}}", "1")]
#[case("{{w}}", "1")]
#[case("{{num_sum}}", "16")]
#[case("{{num_count}}", "2")]
#[case("{{t}}{{w}}", "2")]
#[case("{{t}}{{num_sum}}", "17")]
fn test_mixed_attendance(#[case] placeholder: &str, #[case] shown: &str) {
    assert_eq!(summary(&["8", "W", "8", "T"], placeholder), shown);
}

#[test]
fn test_zero_symbol_count_is_blank() {
    assert_eq!(summary(&["8", "W", "8", "T"], "{{a}}"), "");
    assert_eq!(summary(&["8", "W", "8", "T"], "{{l}}{{p}}"), "");
}

#[test]
fn test_zero_numeric_results_show_zero() {
    assert_eq!(summary(&["W", "T"], "{{num_sum}}"), "0");
    assert_eq!(summary(&["W", "T"], "{{num_count}}"), "0");
}
