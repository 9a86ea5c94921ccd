//! The standard sequence of passes that turns a template into a monthly sheet.

use crate::domain::{default_marks, Employee, Mark, ReportMonth};
use crate::error::{Result, ResultExt};
use crate::handlers::formula::default_keys;
use crate::handlers::{
    BorderHandler, DaysHandler, EmployeeHandler, FormulaHandler, FormulaKey, LabelHandler,
    LegendHandler, MergeCodeHandler, BORDER_TRIGGER, DAYS_PLACEHOLDER, EMPLOYEES_PLACEHOLDER,
    LEGEND_PLACEHOLDER, MERGE_TRIGGER,
};
use crate::processor::Pipeline;
use crate::registry::Registry;
use crate::workbook::Workbook;

pub const DEFAULT_WORKING_TIME: &str = "8";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub month: ReportMonth,
    pub employees: Vec<Employee>,
    pub marks: Vec<Mark>,
    /// Extra `{{key}}` → value labels, applied after the month labels.
    pub labels: Vec<(String, String)>,
    pub working_time: String,
    pub formula_keys: Vec<FormulaKey>,
}

impl ReportConfig {
    pub fn new(month: ReportMonth, employees: Vec<Employee>) -> Self {
        Self {
            month,
            employees,
            marks: default_marks(),
            labels: Vec::new(),
            working_time: DEFAULT_WORKING_TIME.to_string(),
            formula_keys: default_keys(),
        }
    }
}

fn single<'h, H>(pattern: &str, handler: H) -> Result<Registry<'h>>
where
    H: crate::registry::Handler + 'h,
{
    let mut registry = Registry::structural();
    registry.register(pattern, handler)?;
    Ok(registry)
}

/// Run every pass over `book` and hand it back. On error the book is dropped,
/// since earlier passes may already have changed it.
pub fn fill_template<B: Workbook>(book: B, config: &ReportConfig) -> Result<B> {
    let employees = EmployeeHandler::new(&config.employees, config.month)?;
    let mut pipeline = Pipeline::new(book);

    pipeline
        .run(single(DAYS_PLACEHOLDER, DaysHandler::new(config.month))?)
        .context(|| "days")?;
    pipeline
        .run(single(EMPLOYEES_PLACEHOLDER, employees)?)
        .context(|| "employees")?;
    pipeline
        .run(single(LEGEND_PLACEHOLDER, LegendHandler::new(&config.marks))?)
        .context(|| "legend")?;

    let mut labels = LabelHandler::for_month(config.month, &config.working_time);
    for (key, value) in &config.labels {
        labels = labels.add(key.as_str(), value.as_str());
    }
    let mut registry = Registry::stable();
    labels.register(&mut registry)?;
    pipeline.run(registry).context(|| "labels")?;

    let mut registry = Registry::stable();
    FormulaHandler::new(config.formula_keys.clone()).register(&mut registry)?;
    pipeline.run(registry).context(|| "formulas")?;

    let mut registry = Registry::stable();
    registry.register(MERGE_TRIGGER, MergeCodeHandler)?;
    pipeline.run(registry).context(|| "merge codes")?;

    let mut registry = Registry::stable();
    registry.register(BORDER_TRIGGER, BorderHandler::new())?;
    pipeline.run(registry).context(|| "borders")?;

    Ok(pipeline.into_book())
}
