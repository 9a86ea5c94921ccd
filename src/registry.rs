//! Placeholder registry: ordered (pattern, handler) entries, first match wins.

use crate::coord::CellPos;
use crate::error::{Error, Result};
use crate::ledger::BlockLedger;
use crate::styles::{StyleCache, StyleRole};
use crate::workbook::{StyleId, Workbook, MAX_ROWS};

/// Whether a handler or pass may change the row/column structure of a sheet.
///
/// Structural edits move cells that the scanner has not visited yet, so
/// structural handlers only run in structural passes and every structural
/// pass runs before the first stable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Structural,
    Stable,
}

/// A non-empty cell handed to a handler.
#[derive(Debug, Clone, Copy)]
pub struct CellRef<'a> {
    pub sheet: &'a str,
    pub pos: CellPos,
    pub text: &'a str,
}

impl CellRef<'_> {
    pub fn label(&self) -> String {
        self.pos.label()
    }
}

/// Everything a handler may touch during one pass.
pub struct PassContext<'p> {
    pub book: &'p mut dyn Workbook,
    pub styles: StyleCache,
    pub ledger: &'p mut BlockLedger,
}

impl<'p> PassContext<'p> {
    pub fn new(book: &'p mut dyn Workbook, ledger: &'p mut BlockLedger) -> Self {
        Self {
            book,
            styles: StyleCache::new(),
            ledger,
        }
    }

    pub fn style(&mut self, role: StyleRole) -> Result<StyleId> {
        self.styles.role(&mut *self.book, role)
    }

    // Structural edits go through the context so recorded employee blocks follow them.

    pub fn insert_rows(&mut self, sheet: &str, at_row: u32, count: u32) -> Result<()> {
        self.book.insert_rows(sheet, at_row, count)?;
        self.ledger.rows_inserted(sheet, at_row, count);
        Ok(())
    }

    pub fn remove_rows(&mut self, sheet: &str, at_row: u32, count: u32) -> Result<()> {
        self.book.remove_rows(sheet, at_row, count)?;
        self.ledger.rows_removed(sheet, at_row, count);
        Ok(())
    }

    /// Remove the last `count` rows of the sheet. Templates edited in Excel can
    /// keep stray rows near row 1048576, which would make the next insert of
    /// `count` rows run past the end of the sheet.
    pub fn sweep_tail_rows(&mut self, sheet: &str, count: u32) -> Result<()> {
        let count = count.min(MAX_ROWS);
        if count == 0 {
            return Ok(());
        }
        self.remove_rows(sheet, MAX_ROWS - count, count)
    }

    pub fn insert_cols(&mut self, sheet: &str, at_col: u32, count: u32) -> Result<()> {
        self.book.insert_cols(sheet, at_col, count)?;
        self.ledger.cols_inserted(sheet, at_col, count);
        Ok(())
    }

    pub fn remove_cols(&mut self, sheet: &str, at_col: u32, count: u32) -> Result<()> {
        self.book.remove_cols(sheet, at_col, count)?;
        self.ledger.cols_removed(sheet, at_col, count);
        Ok(())
    }
}

pub trait Handler {
    fn kind(&self) -> PassKind {
        PassKind::Stable
    }

    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()>;

    /// Called once after the last cell of the pass.
    fn finish(&mut self, _ctx: &mut PassContext<'_>) -> Result<()> {
        Ok(())
    }
}

struct Entry {
    pattern: String,
    handler: usize,
}

/// Holds the handlers of one pass. A structural pass holds a single handler,
/// since its edits would move cells any other handler still has to visit.
pub struct Registry<'h> {
    kind: PassKind,
    handlers: Vec<Box<dyn Handler + 'h>>,
    entries: Vec<Entry>,
}

impl<'h> Registry<'h> {
    pub fn new(kind: PassKind) -> Self {
        Self {
            kind,
            handlers: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn structural() -> Self {
        Self::new(PassKind::Structural)
    }

    pub fn stable() -> Self {
        Self::new(PassKind::Stable)
    }

    pub fn kind(&self) -> PassKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    /// Add a handler for `pattern` (e.g. "{{days}}"). Entries are checked in
    /// registration order and the first match wins.
    pub fn register<H>(&mut self, pattern: impl Into<String>, handler: H) -> Result<()>
    where
        H: Handler + 'h,
    {
        self.register_all([pattern.into()], handler)
    }

    /// Add one entry per pattern, all sharing a single handler instance.
    pub fn register_all<I, S, H>(&mut self, patterns: I, handler: H) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        H: Handler + 'h,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        if self.kind == PassKind::Stable && handler.kind() == PassKind::Structural {
            return Err(Error::PassKind {
                pattern: patterns.join(", "),
                handler: handler.kind(),
                pass: self.kind,
            });
        }

        if self.kind == PassKind::Structural && !self.handlers.is_empty() {
            return Err(Error::SharedStructuralPass {
                pattern: patterns.join(", "),
            });
        }

        let index = self.handlers.len();
        self.handlers.push(Box::new(handler));
        self.entries.extend(patterns.into_iter().map(|pattern| Entry {
            pattern,
            handler: index,
        }));
        Ok(())
    }

    /// Run the first handler whose pattern occurs in the cell text.
    /// Returns whether any handler matched.
    pub fn dispatch(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<bool> {
        let Some(entry) = self.entries.iter().find(|e| cell.text.contains(&e.pattern)) else {
            return Ok(false);
        };

        log::trace!("{}!{} matched {}", cell.sheet, cell.label(), entry.pattern);
        self.handlers[entry.handler].handle(ctx, cell)?;
        Ok(true)
    }

    pub fn finish(&mut self, ctx: &mut PassContext<'_>) -> Result<()> {
        for handler in &mut self.handlers {
            handler.finish(ctx)?;
        }
        Ok(())
    }
}
