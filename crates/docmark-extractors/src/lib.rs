//! docmark-extractors - Format-specific text extraction for docmark.
//!
//! Provides extractors for paragraph documents, spreadsheets, PDFs and slide
//! decks behind a unified trait-based interface. Each extractor is a
//! capability: the conversion engine asks for one per [`FileFormat`] and
//! treats a missing capability as a dependency error instead of probing for
//! libraries at runtime.
//!
//! # Features
//!
//! - `pdf` (default) - per-page PDF text extraction via pdf-extract
//! - `docx` (default) - paragraph extraction via docx-rs
//! - `spreadsheet` (default) - workbook grids via calamine (xlsx, xlsm, xls)
//! - `pptx` (default) - slide text via zip + quick-xml
//! - `full` - All extraction features
//!
//! # Example
//!
//! ```ignore
//! use docmark_extractors::{ExtractionPipeline, FileFormat};
//!
//! let pipeline = ExtractionPipeline::with_defaults();
//! let content = pipeline.extract(Path::new("report.xlsx"), FileFormat::Xlsx)?;
//! ```

mod command;
mod error;
mod factory;
mod format;
mod pipeline;
mod types;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

#[cfg(feature = "spreadsheet")]
mod spreadsheet;

#[cfg(feature = "pptx")]
mod pptx;

pub use command::CommandConverter;
pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use format::FileFormat;
pub use pipeline::ExtractionPipeline;
pub use types::{CellValue, ContentSource, ExtractedBody, ExtractedContent, Row, Sheet};

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;

#[cfg(feature = "spreadsheet")]
pub use spreadsheet::SpreadsheetExtractor;

#[cfg(feature = "pptx")]
pub use pptx::PptxExtractor;

use std::path::Path;

/// Core Extractor trait - every format capability implements this.
pub trait Extractor: Send + Sync {
    /// Extract structured content from the file at `path`.
    fn extract(&self, path: &Path) -> ExtractResult<ExtractedContent>;

    /// File formats this extractor understands.
    fn supported_formats(&self) -> &[FileFormat];

    /// Check if this extractor handles the given format.
    fn supports(&self, format: FileFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}

/// Generic whole-file converter used when no native extractor applies.
///
/// Receives the raw path and returns Markdown (or plain text) as-is.
pub trait GenericConverter: Send + Sync {
    /// Convert the file at `path` to Markdown.
    fn convert(&self, path: &Path) -> ExtractResult<String>;

    /// Human-readable name for this converter.
    fn name(&self) -> &str;
}
