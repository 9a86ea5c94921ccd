use unicode_width::UnicodeWidthStr;

use crate::coord::{CellPos, CellRange};
use crate::domain::Mark;
use crate::error::{Result, ResultExt};
use crate::registry::{CellRef, Handler, PassContext, PassKind};

pub const LEGEND_PLACEHOLDER: &str = "{{marks_list}}";

const MIN_PAD: usize = 4;
const FILLER: char = '_';

/// Render marks as `name____key` lines of equal display width, so every
/// key ends at the same position.
pub fn legend_lines(marks: &[&Mark]) -> Vec<String> {
    let width = |m: &Mark| m.name.width() + m.key.width();
    let target = marks.iter().map(|m| width(m)).max().unwrap_or(0) + MIN_PAD;

    marks
        .iter()
        .map(|m| {
            let pad = target.saturating_sub(width(m)).max(1);
            format!("{}{}{}", m.name, FILLER.to_string().repeat(pad), m.key)
        })
        .collect()
}

/// Replaces the `{{marks_list}}` row with one row per legend mark, repeating
/// the placeholder's merge width and style.
#[derive(Debug, Clone)]
pub struct LegendHandler<'a> {
    marks: Vec<&'a Mark>,
}

impl<'a> LegendHandler<'a> {
    /// Marks with numeric keys are dropped.
    pub fn new(marks: &'a [Mark]) -> Self {
        Self {
            marks: marks.iter().filter(|m| !m.is_numeric()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl Handler for LegendHandler<'_> {
    fn kind(&self) -> PassKind {
        PassKind::Structural
    }

    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        let sheet = cell.sheet;
        let CellPos { row, col } = cell.pos;

        let style = ctx.book.cell_style(sheet, cell.pos)?;
        let merged = ctx
            .book
            .merged_ranges(sheet)?
            .into_iter()
            .find(|range| range.start == cell.pos);
        let last_col = merged.map(|range| range.end.col).unwrap_or(col);

        if let Some(range) = merged {
            ctx.book.unmerge(sheet, range)?;
        }
        ctx.remove_rows(sheet, row, 1)
            .context(|| "legend: remove template row")?;
        ctx.sweep_tail_rows(sheet, self.marks.len() as u32)
            .context(|| "legend: clear rows at the end of the sheet")?;
        ctx.insert_rows(sheet, row, self.marks.len() as u32)
            .context(|| "legend: insert rows")?;

        for (i, line) in legend_lines(&self.marks).iter().enumerate() {
            let span = CellRange::row_span(row + i as u32, col, last_col);

            ctx.book
                .merge(sheet, span)
                .context(|| format!("legend[{}] merge", i))?;
            ctx.book
                .set_text(sheet, span.start, line)
                .context(|| format!("legend[{}] value", i))?;
            if let Some(style) = style {
                ctx.book
                    .set_style(sheet, span, style)
                    .context(|| format!("legend[{}] style", i))?;
            }
        }

        Ok(())
    }
}
