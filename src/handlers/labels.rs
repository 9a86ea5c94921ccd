use crate::domain::ReportMonth;
use crate::error::{Error, Result, ResultExt};
use crate::registry::{CellRef, Handler, PassContext, Registry};

/// Replaces placeholder keys with fixed text.
///
/// All pairs share one handler: the registry stops at the first matching
/// entry, so whichever key matches first replaces every key in the cell
/// (e.g. "{{month_name}} {{year}}").
#[derive(Debug, Clone, Default)]
pub struct LabelHandler {
    pairs: Vec<(String, String)>,
}

impl LabelHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The month labels: `{{year}}`, `{{month}}`, `{{month_name}}`,
    /// `{{days_count}}` and `{{working_time}}`.
    pub fn for_month(month: ReportMonth, working_time: &str) -> Self {
        Self::new()
            .add("{{year}}", month.year().to_string())
            .add("{{month}}", format!("{:02}", month.month()))
            .add("{{month_name}}", month.name())
            .add("{{days_count}}", month.days().to_string())
            .add("{{working_time}}", working_time)
    }

    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Register one entry per key, all pointing at this handler.
    pub fn register(self, registry: &mut Registry<'_>) -> Result<()> {
        if self.pairs.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> = self.pairs.iter().map(|(key, _)| key.clone()).collect();
        registry.register_all(keys, self)
    }

    pub fn replace(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, (key, value)| acc.replace(key.as_str(), value))
    }
}

/// Parse a `KEY=VALUE` label given on the command line.
pub fn parse_label(text: &str) -> Result<(String, String)> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidLabel(text.to_string())),
    }
}

impl Handler for LabelHandler {
    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        let replaced = self.replace(cell.text);
        ctx.book
            .set_text(cell.sheet, cell.pos, &replaced)
            .context(|| "replace labels")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::CellPos;
    use crate::processor::Pipeline;
    use crate::workbook::{UmyaWorkbook, Workbook};

    #[test]
    fn test_every_key_in_cell_is_replaced() {
        let month = ReportMonth::new(2026, 2).unwrap();
        let mut book = UmyaWorkbook::new();
        let pos = CellPos::new(0, 0);
        book.set_text("Sheet1", pos, "{{month_name}} {{year}} ({{days_count}} days)")
            .unwrap();

        let mut registry = Registry::stable();
        LabelHandler::for_month(month, "8").register(&mut registry).unwrap();

        let mut pipeline = Pipeline::new(book);
        pipeline.run(registry).unwrap();

        assert_eq!(
            pipeline.book().cell_text("Sheet1", pos).unwrap(),
            "February 2026 (28 days)"
        );
    }

    #[test]
    fn test_month_is_zero_padded() {
        let labels = LabelHandler::for_month(ReportMonth::new(2026, 3).unwrap(), "09:00-18:00");
        assert_eq!(labels.replace("{{month}}.{{year}}"), "03.2026");
        assert_eq!(labels.replace("{{working_time}}"), "09:00-18:00");
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            parse_label("{{org}}=Acme=Co").unwrap(),
            ("{{org}}".to_string(), "Acme=Co".to_string())
        );
        assert!(parse_label("novalue").is_err());
        assert!(parse_label("=x").is_err());
    }
}
