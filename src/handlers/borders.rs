use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::coord::{CellPos, CellRange};
use crate::error::{Error, Result, ResultExt};
use crate::registry::{CellRef, Handler, PassContext};

pub const BORDER_TRIGGER: &str = "&";

static BORDER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(\d+)").expect("border marker pattern is valid"));

/// Outlines rectangles marked by pairs of `&N` markers.
///
/// The first `&1` on a sheet opens a range and the next `&1` closes it at the
/// opposite corner. Markers are removed from the text.
#[derive(Debug, Default)]
pub struct BorderHandler {
    open: BTreeMap<(String, u32), CellPos>,
}

impl BorderHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Handler for BorderHandler {
    fn handle(&mut self, ctx: &mut PassContext<'_>, cell: &CellRef<'_>) -> Result<()> {
        let markers = BORDER_MARKER
            .captures_iter(cell.text)
            .map(|c| {
                c[1].parse::<u32>()
                    .map_err(|_| Error::InvalidReference(format!("border marker &{}", &c[1])))
            })
            .collect::<Result<Vec<u32>>>()?;
        if markers.is_empty() {
            return Ok(());
        }

        let cleaned = BORDER_MARKER.replace_all(cell.text, "");
        ctx.book
            .set_text(cell.sheet, cell.pos, &cleaned)
            .context(|| "border marker: set value")?;

        for marker in markers {
            let key = (cell.sheet.to_string(), marker);
            match self.open.remove(&key) {
                Some(start) => {
                    let range = CellRange::new(start, cell.pos);
                    ctx.book
                        .outline_range(cell.sheet, range)
                        .context(|| format!("border &{} {}", marker, range))?;
                    log::debug!("{}: outlined {}", cell.sheet, range);
                }
                None => {
                    self.open.insert(key, cell.pos);
                }
            }
        }

        Ok(())
    }

    fn finish(&mut self, _ctx: &mut PassContext<'_>) -> Result<()> {
        match self.open.keys().next() {
            Some((sheet, marker)) => Err(Error::UnpairedBorderMarker {
                sheet: sheet.clone(),
                marker: *marker,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::Pipeline;
    use crate::registry::Registry;
    use crate::workbook::{UmyaWorkbook, Workbook};

    const SHEET: &str = "Sheet1";

    fn run(book: UmyaWorkbook) -> Result<UmyaWorkbook> {
        let mut registry = Registry::stable();
        registry.register(BORDER_TRIGGER, BorderHandler::new())?;
        let mut pipeline = Pipeline::new(book);
        pipeline.run(registry)?;
        Ok(pipeline.into_book())
    }

    fn has_thin_border(book: &UmyaWorkbook, pos: CellPos) -> bool {
        book.spreadsheet()
            .get_sheet_by_name(SHEET)
            .and_then(|ws| ws.get_cell((pos.col + 1, pos.row + 1)))
            .map(|cell| {
                cell.get_style()
                    .get_borders()
                    .map(|b| b.get_left().get_border_style() == "thin")
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    #[test]
    fn test_pair_outlines_rectangle() {
        let mut book = UmyaWorkbook::new();
        book.set_text(SHEET, CellPos::new(1, 1), "&1No").unwrap();
        book.set_text(SHEET, CellPos::new(3, 2), "Total&1").unwrap();
        book.set_text(SHEET, CellPos::new(5, 5), "R&D").unwrap();

        let book = run(book).unwrap();

        assert_eq!(book.cell_text(SHEET, CellPos::new(1, 1)).unwrap(), "No");
        assert_eq!(book.cell_text(SHEET, CellPos::new(3, 2)).unwrap(), "Total");
        assert_eq!(book.cell_text(SHEET, CellPos::new(5, 5)).unwrap(), "R&D");

        for pos in CellRange::parse("B2:C4").unwrap().positions() {
            assert!(has_thin_border(&book, pos), "no border at {}", pos);
        }
        assert!(!has_thin_border(&book, CellPos::new(5, 5)));
    }

    #[test]
    fn test_unpaired_marker_fails_the_pass() {
        let mut book = UmyaWorkbook::new();
        book.set_text(SHEET, CellPos::new(0, 0), "&2 start").unwrap();

        let err = run(book).err().unwrap();
        assert!(matches!(
            err.root(),
            Error::UnpairedBorderMarker { marker: 2, .. }
        ));
    }
}
