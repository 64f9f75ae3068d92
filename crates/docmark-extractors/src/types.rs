//! Core types for content extraction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// A single spreadsheet cell: absent, or a scalar convertible to text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Boolean cell.
    Bool(bool),
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
    /// Text (dates and error values arrive here already formatted).
    Text(String),
}

impl CellValue {
    /// A cell is empty when it has no value or only whitespace text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Whether the cell holds no value at all.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Ordered cells of one grid row.
pub type Row = Vec<CellValue>;

/// One worksheet's full grid, anchored at the first cell (A1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet title as shown in the workbook.
    pub name: String,
    /// Every row of the used area.
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create a sheet from a title and rows.
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Check if the sheet has no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The shape of what an extractor produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ExtractedBody {
    /// Top-level paragraph texts in document order.
    Paragraphs(Vec<String>),
    /// Worksheets in workbook order.
    Sheets(Vec<Sheet>),
    /// Per-page text in page order (index 0 is page 1).
    Pages(Vec<String>),
    /// Per-slide text fragments, one entry per text-bearing shape.
    Slides(Vec<Vec<String>>),
}

impl ExtractedBody {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractedBody::Paragraphs(_) => "paragraphs",
            ExtractedBody::Sheets(_) => "sheets",
            ExtractedBody::Pages(_) => "pages",
            ExtractedBody::Slides(_) => "slides",
        }
    }

    /// Number of top-level units (paragraphs, sheets, pages or slides).
    pub fn len(&self) -> usize {
        match self {
            ExtractedBody::Paragraphs(p) => p.len(),
            ExtractedBody::Sheets(s) => s.len(),
            ExtractedBody::Pages(p) => p.len(),
            ExtractedBody::Slides(s) => s.len(),
        }
    }

    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Source reference for extracted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentSource {
    /// Content read from a file path.
    Path(PathBuf),
    /// Content provided as bytes (no file reference).
    Bytes,
}

/// Extracted content with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Extracted structure.
    pub body: ExtractedBody,

    /// Reference to original content.
    pub source: ContentSource,

    /// Name of the extractor that produced this content.
    pub extractor: String,

    /// Additional metadata (format-specific).
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ExtractedContent {
    /// Create new extracted content.
    pub fn new(body: ExtractedBody, source: ContentSource, extractor: impl Into<String>) -> Self {
        Self {
            body,
            source,
            extractor: extractor.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_emptiness() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::from("  \t").is_empty());
        assert!(!CellValue::from("x").is_empty());
        assert!(!CellValue::Int(0).is_empty());
        assert!(CellValue::from(None::<&str>).is_null());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
    }

    #[test]
    fn test_body_len() {
        let body = ExtractedBody::Pages(vec!["a".into(), String::new()]);
        assert_eq!(body.len(), 2);
        assert_eq!(body.kind(), "pages");
        assert!(ExtractedBody::Sheets(Vec::new()).is_empty());
    }

    #[test]
    fn test_content_metadata() {
        let content = ExtractedContent::new(
            ExtractedBody::Paragraphs(vec!["p".into()]),
            ContentSource::Bytes,
            "test",
        )
        .with_metadata("original_size", 12);
        assert_eq!(content.metadata["original_size"], 12);
        assert_eq!(content.extractor, "test");
    }
}
