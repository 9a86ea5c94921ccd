use crate::error::{Error, Result};
use std::io::Cursor;
use std::path::Path;
use umya_spreadsheet::Spreadsheet;

/// Serialize a workbook to `.xlsx` bytes.
pub fn to_bytes(book: &Spreadsheet) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut buffer)
        .map_err(|e| Error::Save(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Write the workbook to `path`. Nothing is written if serialization fails.
pub fn save(book: &Spreadsheet, path: &Path) -> Result<()> {
    let bytes = to_bytes(book)?;
    std::fs::write(path, bytes)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
