//! Fill Excel attendance templates: one column per day of the month, one row
//! per employee, and per-employee summary formulas.
//!
//! Templates mark the spots to fill with placeholders such as `{{days}}`,
//! `{{start_process}}` or `{{t}}`. Each placeholder family has a [`Handler`];
//! handlers are grouped into [`Registry`] passes that a [`Pipeline`] runs over
//! every cell of the workbook.

pub mod coord;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod logger;
pub mod processor;
pub mod reader;
pub mod records;
pub mod registry;
pub mod report;
pub mod sample;
pub mod styles;
pub mod workbook;
pub mod writer;

pub use error::{Error, Result};
pub use processor::{PassSummary, Pipeline};
pub use registry::{Handler, PassKind, Registry};
pub use report::{fill_template, ReportConfig};
pub use workbook::{UmyaWorkbook, Workbook};
