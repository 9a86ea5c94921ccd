//! Runs registries over every cell of a workbook.

use crate::coord::CellPos;
use crate::error::{Error, Result, ResultExt};
use crate::ledger::BlockLedger;
use crate::registry::{CellRef, PassContext, PassKind, Registry};
use crate::workbook::Workbook;

/// Counters for one finished pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub kind: PassKind,
    pub sheets: usize,
    pub cells: usize,
    pub matched: usize,
}

/// Owns the workbook and the employee-block ledger across passes.
///
/// Passes are run in submission order; every structural pass must come before
/// the first stable one.
#[derive(Debug)]
pub struct Pipeline<B: Workbook> {
    book: B,
    ledger: BlockLedger,
    stable_seen: bool,
    passes: usize,
}

impl<B: Workbook> Pipeline<B> {
    pub fn new(book: B) -> Self {
        Self::with_ledger(book, BlockLedger::new())
    }

    /// Start from blocks recorded elsewhere, e.g. by a previous run.
    pub fn with_ledger(book: B, ledger: BlockLedger) -> Self {
        Self {
            book,
            ledger,
            stable_seen: false,
            passes: 0,
        }
    }

    pub fn run(&mut self, mut registry: Registry<'_>) -> Result<PassSummary> {
        let kind = registry.kind();
        if kind == PassKind::Structural && self.stable_seen {
            return Err(Error::PassOrder);
        }
        if kind == PassKind::Stable {
            self.stable_seen = true;
        }
        self.passes += 1;

        let pass = self.passes;
        let patterns = registry.patterns().collect::<Vec<_>>().join(" ");
        log::debug!("pass {} ({:?}): {}", pass, kind, patterns);

        let mut ctx = PassContext::new(&mut self.book, &mut self.ledger);
        let summary = scan(&mut ctx, &mut registry, kind)?;

        log::info!(
            "pass {} ({:?}): {} sheets, {} cells, {} matched",
            pass,
            kind,
            summary.sheets,
            summary.cells,
            summary.matched
        );
        Ok(summary)
    }

    pub fn book(&self) -> &B {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut B {
        &mut self.book
    }

    pub fn ledger(&self) -> &BlockLedger {
        &self.ledger
    }

    pub fn into_book(self) -> B {
        self.book
    }
}

/// Visit every non-empty cell once. Each sheet's text grid is read before its
/// first cell is dispatched, so cells created by a handler are not visited.
fn scan(ctx: &mut PassContext<'_>, registry: &mut Registry<'_>, kind: PassKind) -> Result<PassSummary> {
    let mut summary = PassSummary {
        kind,
        sheets: 0,
        cells: 0,
        matched: 0,
    };

    for sheet in ctx.book.sheet_names() {
        let rows = ctx.book.rows(&sheet)?;
        summary.sheets += 1;

        for (r, record) in rows.iter().enumerate() {
            for (c, text) in record.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                summary.cells += 1;

                let cell = CellRef {
                    sheet: &sheet,
                    pos: CellPos::new(r as u32, c as u32),
                    text,
                };
                let matched = registry
                    .dispatch(ctx, &cell)
                    .context(|| format!("cell {}", cell.label()))
                    .context(|| format!("sheet \"{}\"", sheet))?;
                if matched {
                    summary.matched += 1;
                }
            }
        }
    }

    registry.finish(ctx)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Handler;
    use crate::workbook::UmyaWorkbook;
    use pretty_assertions::assert_eq;

    const SHEET: &str = "Sheet1";

    struct Fails;

    impl Handler for Fails {
        fn handle(&mut self, _ctx: &mut PassContext<'_>, _cell: &CellRef<'_>) -> Result<()> {
            Err(Error::InvalidReference("boom".to_string()))
        }
    }

    struct Grows;

    impl Handler for Grows {
        fn kind(&self) -> PassKind {
            PassKind::Structural
        }

        fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
            ctx.insert_rows(cell.sheet, cell.pos.row + 1, 1)?;
            ctx.book
                .set_text(cell.sheet, CellPos::new(cell.pos.row + 1, cell.pos.col), "{{grow}}")
        }
    }

    fn sample_book() -> UmyaWorkbook {
        let mut book = UmyaWorkbook::new();
        book.set_text(SHEET, CellPos::new(0, 0), "Name").unwrap();
        book.set_text(SHEET, CellPos::new(1, 2), "3 [x] & y").unwrap();
        book.add_sheet("Other").unwrap();
        book.set_text("Other", CellPos::new(4, 1), "plain").unwrap();
        book
    }

    #[test]
    fn test_placeholder_free_book_is_unchanged() {
        let book = sample_book();
        let before = (book.rows(SHEET).unwrap(), book.rows("Other").unwrap());

        let mut registry = Registry::stable();
        registry.register("{{never}}", Fails).unwrap();
        let mut pipeline = Pipeline::new(book);
        let summary = pipeline.run(registry).unwrap();

        assert_eq!(
            summary,
            PassSummary {
                kind: PassKind::Stable,
                sheets: 2,
                cells: 3,
                matched: 0,
            }
        );
        let book = pipeline.book();
        assert_eq!((book.rows(SHEET).unwrap(), book.rows("Other").unwrap()), before);
    }

    #[test]
    fn test_error_names_sheet_and_cell() {
        let mut registry = Registry::stable();
        registry.register("plain", Fails).unwrap();

        let err = Pipeline::new(sample_book()).run(registry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sheet \"Other\": cell B5: invalid cell reference: boom"
        );
    }

    #[test]
    fn test_structural_pass_after_stable_is_rejected() {
        let mut pipeline = Pipeline::new(sample_book());
        pipeline.run(Registry::structural()).unwrap();
        pipeline.run(Registry::stable()).unwrap();

        let err = pipeline.run(Registry::structural()).unwrap_err();
        assert!(matches!(err, Error::PassOrder));
    }

    #[test]
    fn test_new_cells_are_not_revisited() {
        let mut book = UmyaWorkbook::new();
        book.set_text(SHEET, CellPos::new(0, 0), "{{grow}}").unwrap();

        let mut registry = Registry::structural();
        registry.register("{{grow}}", Grows).unwrap();
        let mut pipeline = Pipeline::new(book);
        let summary = pipeline.run(registry).unwrap();

        assert_eq!(summary.matched, 1);
        assert_eq!(pipeline.book().rows(SHEET).unwrap().len(), 2);
    }
}
