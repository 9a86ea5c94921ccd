//! Per-employee summary formulas.
//!
//! A summary cell below the employee block names one or more keys
//! (`{{t}}{{d}}`); one formula per employee row is written into that cell's
//! column, computed over the row's attendance range.

use std::collections::HashSet;
use std::ops::Range;

use crate::coord::{CellPos, CellRange};
use crate::error::{Error, Result, ResultExt};
use crate::registry::{CellRef, Handler, PassContext, PassKind, Registry};
use crate::styles::StyleRole;

/// Produces the formula for one attendance range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaGen {
    /// Occurrences of `symbol`, each worth `weight`.
    ///
    /// `"W"` with weight 1 → `SUMPRODUCT((range="W")*1)`
    SymbolCount { symbol: String, weight: i64 },
    /// Sum of every cell that parses as a number; other cells count as 0.
    ///
    /// `"8", "W", "8"` → 16
    NumericSum,
    /// Number of cells that parse as a number.
    ///
    /// `"8", "W", "8"` → 2
    NumericCount,
}

impl FormulaGen {
    pub fn count(symbol: impl Into<String>, weight: i64) -> Self {
        FormulaGen::SymbolCount {
            symbol: symbol.into(),
            weight,
        }
    }

    pub fn render(&self, range: &str) -> String {
        match self {
            FormulaGen::SymbolCount { symbol, weight } => format!(
                r#"SUMPRODUCT(({}="{}")*{})"#,
                range,
                symbol.replace('"', "\"\""),
                weight
            ),
            FormulaGen::NumericSum => {
                format!("IFERROR(SUMPRODUCT(IFERROR(VALUE({}),0)),0)", range)
            }
            FormulaGen::NumericCount => {
                format!("IFERROR(SUMPRODUCT(IFERROR(VALUE({})*0+1,0)),0)", range)
            }
        }
    }

    /// Symbol counts show an empty cell for zero; numeric results show `0`.
    pub fn blank_when_zero(&self) -> bool {
        matches!(self, FormulaGen::SymbolCount { .. })
    }
}

/// A summary placeholder and its generator. Without a generator the key only
/// styles the employee cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaKey {
    pub pattern: String,
    pub generator: Option<FormulaGen>,
}

impl FormulaKey {
    pub fn new(pattern: impl Into<String>, generator: FormulaGen) -> Self {
        Self {
            pattern: pattern.into(),
            generator: Some(generator),
        }
    }

    pub fn style_only(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            generator: None,
        }
    }
}

/// Keys understood by the standard attendance template.
pub fn default_keys() -> Vec<FormulaKey> {
    let mut keys: Vec<FormulaKey> = ["T", "D", "W", "L", "A", "P"]
        .into_iter()
        .map(|symbol| {
            FormulaKey::new(
                format!("{{{{{}}}}}", symbol.to_lowercase()),
                FormulaGen::count(symbol, 1),
            )
        })
        .collect();
    keys.push(FormulaKey::new("{{num_sum}}", FormulaGen::NumericSum));
    keys.push(FormulaKey::new("{{num_count}}", FormulaGen::NumericCount));
    keys.push(FormulaKey::style_only("{{}}"));
    keys
}

/// Combine every generator of `keys` into one formula; `None` when all keys
/// are style-only.
pub fn combine(keys: &[&FormulaKey], range: &str) -> Option<String> {
    let generators: Vec<&FormulaGen> = keys.iter().filter_map(|k| k.generator.as_ref()).collect();
    if generators.is_empty() {
        return None;
    }

    let sum = generators
        .iter()
        .map(|g| g.render(range))
        .collect::<Vec<_>>()
        .join("+");

    if generators.iter().all(|g| g.blank_when_zero()) {
        Some(format!(r#"IF({0}=0,"",({0}))"#, sum))
    } else {
        Some(sum)
    }
}

/// Where the employee rows above a summary cell come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSource {
    /// The nearest block recorded by the employee handler.
    Ledger,
    /// `count` rows directly above the summary cell. Rows that would fall
    /// above the sheet are skipped.
    Fixed {
        count: u32,
        attendance_col: u32,
        days: u32,
    },
}

/// What happens to the summary placeholder once the formulas are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRowPolicy {
    ClearCell,
    /// Delete the whole placeholder row, once per row. Structural.
    RemoveRow,
}

struct Target {
    rows: Range<u32>,
    attendance_col: u32,
    days: u32,
}

/// Shared by every formula key: a cell naming several keys gets one combined formula.
#[derive(Debug)]
pub struct FormulaHandler {
    keys: Vec<FormulaKey>,
    rows: RowSource,
    policy: TemplateRowPolicy,
    removed_rows: HashSet<(String, u32)>,
}

impl FormulaHandler {
    pub fn new(keys: Vec<FormulaKey>) -> Self {
        Self {
            keys,
            rows: RowSource::Ledger,
            policy: TemplateRowPolicy::ClearCell,
            removed_rows: HashSet::new(),
        }
    }

    pub fn with_rows(mut self, rows: RowSource) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_policy(mut self, policy: TemplateRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register every key pattern against this one handler.
    pub fn register(self, registry: &mut Registry<'_>) -> Result<()> {
        let patterns: Vec<String> = self.keys.iter().map(|k| k.pattern.clone()).collect();
        registry.register_all(patterns, self)
    }

    pub fn matching_keys(&self, text: &str) -> Vec<&FormulaKey> {
        self.keys
            .iter()
            .filter(|k| text.contains(&k.pattern))
            .collect()
    }

    fn target(&self, ctx: &PassContext<'_>, cell: &CellRef<'_>) -> Result<Target> {
        let row = cell.pos.row;
        match &self.rows {
            RowSource::Fixed {
                count,
                attendance_col,
                days,
            } => Ok(Target {
                rows: row.saturating_sub(*count)..row,
                attendance_col: *attendance_col,
                days: *days,
            }),
            RowSource::Ledger => {
                let block = ctx.ledger.nearest_above(cell.sheet, row).ok_or_else(|| {
                    Error::MissingEmployeeBlock {
                        sheet: cell.sheet.to_string(),
                        cell: cell.label(),
                    }
                })?;
                if block.end_row() != row {
                    log::warn!(
                        "{}!{}: summary cell is {} rows below the employee block",
                        cell.sheet,
                        cell.label(),
                        row - block.end_row()
                    );
                }
                Ok(Target {
                    rows: block.rows(),
                    attendance_col: block.attendance_col,
                    days: block.days,
                })
            }
        }
    }

    fn dispose_placeholder(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        match self.policy {
            TemplateRowPolicy::ClearCell => ctx
                .book
                .clear_cell(cell.sheet, cell.pos)
                .context(|| "clear summary placeholder"),
            TemplateRowPolicy::RemoveRow => {
                // several keys can share a row; only the first hit removes it
                if self.removed_rows.insert((cell.sheet.to_string(), cell.pos.row)) {
                    ctx.remove_rows(cell.sheet, cell.pos.row, 1)
                        .context(|| "remove summary row")?;
                }
                Ok(())
            }
        }
    }
}

impl Handler for FormulaHandler {
    fn kind(&self) -> PassKind {
        match self.policy {
            TemplateRowPolicy::ClearCell => PassKind::Stable,
            TemplateRowPolicy::RemoveRow => PassKind::Structural,
        }
    }

    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        if self.matching_keys(cell.text).is_empty() {
            return Ok(());
        }

        let target = self.target(ctx, cell)?;
        let centered = ctx.style(StyleRole::Centered)?;
        let last_col = target.attendance_col + target.days.max(1) - 1;

        {
            let keys = self.matching_keys(cell.text);
            for row in target.rows.clone() {
                let range = CellRange::row_span(row, target.attendance_col, last_col).to_string();
                let at = CellPos::new(row, cell.pos.col);

                if let Some(formula) = combine(&keys, &range) {
                    ctx.book
                        .set_formula(cell.sheet, at, &formula)
                        .context(|| format!("set formula at {}", at))?;
                }
                ctx.book
                    .set_style(cell.sheet, at.into(), centered)
                    .context(|| format!("set style at {}", at))?;
            }
        }

        log::debug!(
            "{}!{}: summary for rows {}..{}",
            cell.sheet,
            cell.label(),
            target.rows.start + 1,
            target.rows.end
        );

        self.dispose_placeholder(ctx, cell)
    }
}
