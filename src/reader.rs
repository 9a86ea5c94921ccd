//! Loading attendance templates from disk or memory.

use crate::error::{Error, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use umya_spreadsheet::Spreadsheet;

/// File formats a template can be read from. Filled sheets are always
/// written as `.xlsx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    /// `.xlsx` and macro-enabled `.xlsm`.
    OpenXml,
    /// Legacy binary `.xls`, converted on load.
    Legacy,
}

impl TemplateFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" => Ok(TemplateFormat::OpenXml),
            "xls" => Ok(TemplateFormat::Legacy),
            _ => Err(Error::UnsupportedFormat(extension)),
        }
    }
}

fn unreadable(path: &Path, details: impl ToString) -> Error {
    Error::InvalidExcel {
        path: path.to_path_buf(),
        details: details.to_string(),
    }
}

/// Load the template at `path`. The format is chosen by extension.
pub fn open_template(path: &Path) -> Result<Spreadsheet> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let format = TemplateFormat::from_path(path)?;
    log::debug!("loading {:?} template {}", format, path.display());

    let book = match format {
        TemplateFormat::OpenXml => {
            umya_spreadsheet::reader::xlsx::read(path).map_err(|e| unreadable(path, e))?
        }
        TemplateFormat::Legacy => xlrd::open(path).map_err(|e| unreadable(path, e))?,
    };

    if book.get_sheet_collection_no_check().is_empty() {
        return Err(unreadable(path, "template has no worksheets"));
    }
    Ok(book)
}

/// Load an `.xlsx` template from an in-memory buffer.
pub fn read_bytes(bytes: &[u8]) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
        .map_err(|e| unreadable(&PathBuf::from("<memory>"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sheet.xlsx", TemplateFormat::OpenXml)]
    #[case("Tabel.XLSM", TemplateFormat::OpenXml)]
    #[case("old/tabel.xls", TemplateFormat::Legacy)]
    fn test_format_from_extension(#[case] path: &str, #[case] format: TemplateFormat) {
        assert_eq!(TemplateFormat::from_path(Path::new(path)).unwrap(), format);
    }

    #[test]
    fn test_missing_file() {
        let err = open_template(Path::new("does/not/exist.xlsx")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ods").tempfile().unwrap();
        let err = open_template(file.path()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ext) if ext == "ods"));
        assert!(TemplateFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_corrupt_template_names_its_path() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::fs::write(file.path(), b"not a zip archive").unwrap();

        let err = open_template(file.path()).unwrap_err();
        assert!(matches!(&err, Error::InvalidExcel { path, .. } if path == file.path()));
    }

    #[test]
    fn test_garbage_bytes_are_invalid() {
        assert!(matches!(
            read_bytes(b"not a zip archive"),
            Err(Error::InvalidExcel { .. })
        ));
    }
}
