//! Recalculates a filled workbook so tests can check what a spreadsheet
//! application would display.

use formualizer_workbook::{
    backends::UmyaAdapter,
    traits::{LoadStrategy, SpreadsheetReader},
    LiteralValue, Workbook as EvalWorkbook, WorkbookConfig,
};
use sheetfill::coord::CellPos;
use sheetfill::UmyaWorkbook;

pub struct Evaluated {
    workbook: EvalWorkbook,
}

/// Save `book`, load it back through formualizer and evaluate every formula.
pub fn evaluate(book: &UmyaWorkbook) -> Evaluated {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evaluated.xlsx");
    book.save(&path).unwrap();

    let adapter = UmyaAdapter::open_path(&path)
        .unwrap_or_else(|e| panic!("formualizer: open {}: {}", path.display(), e));
    let mut workbook =
        EvalWorkbook::from_reader(adapter, LoadStrategy::EagerAll, WorkbookConfig::ephemeral())
            .unwrap_or_else(|e| panic!("formualizer: load: {}", e));
    workbook
        .evaluate_all()
        .unwrap_or_else(|e| panic!("evaluation failed: {}", e));

    Evaluated { workbook }
}

impl Evaluated {
    /// The displayed value of a cell, formatted the way the sheet shows it.
    pub fn shown(&self, sheet: &str, pos: CellPos) -> String {
        match self.workbook.get_value(sheet, pos.row + 1, pos.col + 1) {
            None | Some(LiteralValue::Empty) => String::new(),
            Some(LiteralValue::Int(i)) => i.to_string(),
            // adding 0.0 turns a negative zero into 0
            Some(LiteralValue::Number(n)) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{:.0}", n + 0.0)
            }
            Some(LiteralValue::Number(n)) => n.to_string(),
            Some(LiteralValue::Text(s)) => s,
            Some(LiteralValue::Boolean(b)) => if b { "TRUE" } else { "FALSE" }.to_string(),
            Some(LiteralValue::Error(e)) => format!("{}", e),
            Some(other) => format!("{:?}", other),
        }
    }
}
