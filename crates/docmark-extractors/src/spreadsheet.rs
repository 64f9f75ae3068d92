//! Workbook extraction using calamine.
//!
//! Handles `.xlsx`, `.xlsm` and `.xls` through calamine's auto-detecting
//! reader. Each worksheet becomes a [`Sheet`] whose grid is anchored at A1,
//! so leading blank rows and columns of the used range are kept as empty
//! cells the way a cell-by-cell read would see them.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{ExtractError, ExtractResult};
use crate::format::FileFormat;
use crate::types::{CellValue, ContentSource, ExtractedBody, ExtractedContent, Row, Sheet};
use crate::Extractor;

/// Spreadsheet extractor backed by calamine.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExtractor {
    /// Keep unreadable sheets as empty instead of failing the workbook.
    skip_unreadable_sheets: bool,
}

impl SpreadsheetExtractor {
    /// Create new spreadsheet extractor with default settings.
    pub fn new() -> Self {
        Self {
            skip_unreadable_sheets: false,
        }
    }

    /// Configure whether a sheet that fails to load is skipped.
    pub fn with_skip_unreadable_sheets(mut self, skip: bool) -> Self {
        self.skip_unreadable_sheets = skip;
        self
    }

    /// Read every worksheet of the workbook at `path`.
    pub fn sheets(&self, path: &Path) -> ExtractResult<Vec<Sheet>> {
        let format = FileFormat::from_path(path);
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ExtractError::malformed(format, e))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            match workbook.worksheet_range(&name) {
                Ok(range) => sheets.push(Sheet::new(name, range_to_rows(&range))),
                Err(e) if self.skip_unreadable_sheets => {
                    tracing::warn!(sheet = %name, error = %e, "Skipping unreadable worksheet");
                }
                Err(e) => {
                    return Err(ExtractError::malformed(
                        format,
                        format!("worksheet '{}': {}", name, e),
                    ));
                }
            }
        }

        Ok(sheets)
    }
}

/// Expand a calamine range into A1-anchored rows.
fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let width = start_col as usize + range.width();
    let mut rows: Vec<Row> = (0..start_row)
        .map(|_| vec![CellValue::Empty; width])
        .collect();
    for row in range.rows() {
        let mut cells: Row = (0..start_col).map(|_| CellValue::Empty).collect();
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    rows
}

/// Convert a calamine cell into a scalar.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Text(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        other => CellValue::Text(other.to_string()),
    }
}

impl Extractor for SpreadsheetExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<ExtractedContent> {
        let sheets = self.sheets(path)?;

        tracing::debug!(path = %path.display(), sheets = sheets.len(), "Extracted workbook");

        let sheet_count = sheets.len();
        Ok(ExtractedContent::new(
            ExtractedBody::Sheets(sheets),
            ContentSource::Path(path.to_path_buf()),
            self.name(),
        )
        .with_metadata("sheet_count", sheet_count))
    }

    fn supported_formats(&self) -> &[FileFormat] {
        &[FileFormat::Xlsx, FileFormat::Xlsm, FileFormat::Xls]
    }

    fn name(&self) -> &str {
        "calamine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_extractor_creation() {
        let extractor = SpreadsheetExtractor::new();
        assert_eq!(extractor.name(), "calamine");
        assert!(extractor.supports(FileFormat::Xlsx));
        assert!(extractor.supports(FileFormat::Xlsm));
        assert!(extractor.supports(FileFormat::Xls));
        assert!(!extractor.supports(FileFormat::Pdf));
    }

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::String("abc".into())),
            CellValue::Text("abc".into())
        );
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Int(7));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(cell_value(&Data::Bool(false)), CellValue::Bool(false));
    }

    #[test]
    fn test_range_anchored_at_a1() {
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("h1".into()));
        range.set_value((1, 2), Data::String("h2".into()));
        range.set_value((2, 1), Data::Int(1));

        let rows = range_to_rows(&range);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![CellValue::Empty; 3]);
        assert_eq!(
            rows[1],
            vec![
                CellValue::Empty,
                CellValue::Text("h1".into()),
                CellValue::Text("h2".into())
            ]
        );
        assert_eq!(rows[2], vec![CellValue::Empty, CellValue::Int(1), CellValue::Empty]);
    }

    #[test]
    fn test_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_rows(&range).is_empty());
    }

    #[test]
    fn test_open_invalid_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let result = SpreadsheetExtractor::new().sheets(&path);
        assert!(matches!(result, Err(ExtractError::Malformed {
                format: FileFormat::Xlsx,
                ..
            })));
    }
}
