use once_cell::sync::Lazy;
use regex::Regex;

use crate::coord::{CellPos, CellRange};
use crate::error::{Error, Result, ResultExt};
use crate::registry::{CellRef, Handler, PassContext};

pub const MERGE_TRIGGER: &str = "[";

static MERGE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+):(\d+)\]").expect("merge code pattern is valid"));

/// Strips `[rows:cols]` codes from a cell and merges it with that many extra
/// rows below and columns to the right:
///
/// ```text
/// [1:0] → one row down
/// [1:1] → one row down and one column right
/// [0:2] → two columns right
/// [0:0] → strip only
/// ```
///
/// Needs stable row indices, so run it after every structural pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeCodeHandler;

fn span(digits: &str) -> Result<u32> {
    digits
        .parse()
        .map_err(|_| Error::InvalidReference(format!("merge span {}", digits)))
}

impl Handler for MergeCodeHandler {
    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        // "[" without a code is ordinary text
        let Some(code) = MERGE_CODE.captures(cell.text) else {
            return Ok(());
        };

        let extra_rows = span(&code[1])?;
        let extra_cols = span(&code[2])?;
        let cleaned = MERGE_CODE.replace_all(cell.text, "");

        let style = ctx.book.cell_style(cell.sheet, cell.pos)?;
        ctx.book
            .set_text(cell.sheet, cell.pos, &cleaned)
            .context(|| "merge code: set value")?;

        if extra_rows == 0 && extra_cols == 0 {
            return Ok(());
        }

        let end = CellPos::new(
            cell.pos.row.saturating_add(extra_rows),
            cell.pos.col.saturating_add(extra_cols),
        );
        let range = CellRange::new(cell.pos, end);
        ctx.book
            .merge(cell.sheet, range)
            .context(|| format!("merge code: merge {}", range))?;

        if let Some(style) = style {
            ctx.book
                .set_style(cell.sheet, range, style)
                .context(|| "merge code: style")?;
        }

        Ok(())
    }
}
