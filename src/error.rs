use std::path::PathBuf;
use thiserror::Error;

use crate::registry::PassKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid Excel file: {path} ({details})")]
    InvalidExcel { path: PathBuf, details: String },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to save workbook: {0}")]
    Save(String),

    #[error("sheet \"{0}\" not found")]
    SheetNotFound(String),

    #[error("{op} rejected: {details}")]
    Structural { op: &'static str, details: String },

    #[error("invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("unknown style handle {0}")]
    UnknownStyle(u32),

    #[error("handler for \"{pattern}\" is {handler:?} and cannot run in a {pass:?} pass")]
    PassKind {
        pattern: String,
        handler: PassKind,
        pass: PassKind,
    },

    #[error("structural pass already has a handler; \"{pattern}\" needs a pass of its own")]
    SharedStructuralPass { pattern: String },

    #[error("structural pass submitted after a stable pass")]
    PassOrder,

    #[error("employee {id}: attendance has {actual} days, report month has {expected}")]
    AttendanceLength { id: u32, actual: usize, expected: u32 },

    #[error("no employee block above {cell} on sheet \"{sheet}\"")]
    MissingEmployeeBlock { sheet: String, cell: String },

    #[error("border marker &{marker} on sheet \"{sheet}\" has no closing pair")]
    UnpairedBorderMarker { sheet: String, marker: u32 },

    #[error("invalid month \"{0}\" (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("invalid label \"{0}\" (expected KEY=VALUE)")]
    InvalidLabel(String),

    #[error("invalid record at line {line}: {details}")]
    InvalidRecord { line: u64, details: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::FileNotFound(_) => 1,
            Error::InvalidExcel { .. } => 2,
            Error::UnsupportedFormat(_) => 3,
            Error::Save(_) => 1,
            Error::SheetNotFound(_) => 4,
            Error::Structural { .. } => 4,
            Error::InvalidReference(_) => 4,
            Error::UnknownStyle(_) => 4,
            Error::PassKind { .. } => 3,
            Error::SharedStructuralPass { .. } => 3,
            Error::PassOrder => 3,
            Error::AttendanceLength { .. } => 3,
            Error::MissingEmployeeBlock { .. } => 4,
            Error::UnpairedBorderMarker { .. } => 4,
            Error::InvalidMonth(_) => 3,
            Error::InvalidLabel(_) => 3,
            Error::InvalidRecord { .. } => 3,
            Error::Context { source, .. } => source.exit_code(),
            Error::Csv(_) => 3,
            Error::Io(_) => 1,
        }
    }

    /// The innermost error, skipping every `Context` layer.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn context(self, context: impl Into<String>) -> Error {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

pub trait ResultExt<T> {
    /// Wrap the error with a lazily built context message.
    fn context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
