//! Placeholder handlers, one module per placeholder family.

pub mod borders;
pub mod days;
pub mod employees;
pub mod formula;
pub mod labels;
pub mod legend;
pub mod merge;

pub use borders::{BorderHandler, BORDER_TRIGGER};
pub use days::{DaysHandler, DAYS_PLACEHOLDER};
pub use employees::{EmployeeHandler, EMPLOYEES_PLACEHOLDER};
pub use formula::{FormulaGen, FormulaHandler, FormulaKey, RowSource, TemplateRowPolicy};
pub use labels::{parse_label, LabelHandler};
pub use legend::{LegendHandler, LEGEND_PLACEHOLDER};
pub use merge::{MergeCodeHandler, MERGE_TRIGGER};
