//! Factory for creating extractors.

use std::sync::Arc;

use crate::error::{ExtractError, ExtractResult};
use crate::format::FileFormat;
use crate::Extractor;

#[cfg(feature = "pdf")]
use crate::PdfExtractor;

#[cfg(feature = "docx")]
use crate::DocxExtractor;

#[cfg(feature = "spreadsheet")]
use crate::SpreadsheetExtractor;

#[cfg(feature = "pptx")]
use crate::PptxExtractor;

/// Factory for creating content extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a DOCX extractor.
    #[cfg(feature = "docx")]
    pub fn docx() -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new())
    }

    /// Create a DOCX extractor that ignores hyperlink text.
    #[cfg(feature = "docx")]
    pub fn docx_without_hyperlinks() -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new().with_hyperlinks(false))
    }

    /// Create a workbook extractor.
    #[cfg(feature = "spreadsheet")]
    pub fn spreadsheet() -> Arc<dyn Extractor> {
        Arc::new(SpreadsheetExtractor::new())
    }

    /// Create a slide deck extractor.
    #[cfg(feature = "pptx")]
    pub fn pptx() -> Arc<dyn Extractor> {
        Arc::new(PptxExtractor::new())
    }

    /// Create extractor for a given file format.
    pub fn for_format(format: FileFormat) -> ExtractResult<Arc<dyn Extractor>> {
        match format {
            #[cfg(feature = "pdf")]
            FileFormat::Pdf => Ok(Self::pdf()),

            #[cfg(feature = "docx")]
            FileFormat::Docx | FileFormat::Doc => Ok(Self::docx()),

            #[cfg(feature = "spreadsheet")]
            FileFormat::Xlsx | FileFormat::Xlsm | FileFormat::Xls => Ok(Self::spreadsheet()),

            #[cfg(feature = "pptx")]
            FileFormat::Pptx => Ok(Self::pptx()),

            _ => Err(ExtractError::UnsupportedFormat(format)),
        }
    }

    /// Get all available extractors.
    #[allow(clippy::vec_init_then_push)]
    pub fn all() -> Vec<Arc<dyn Extractor>> {
        let mut extractors: Vec<Arc<dyn Extractor>> = Vec::new();

        #[cfg(feature = "pdf")]
        extractors.push(Self::pdf());

        #[cfg(feature = "docx")]
        extractors.push(Self::docx());

        #[cfg(feature = "spreadsheet")]
        extractors.push(Self::spreadsheet());

        #[cfg(feature = "pptx")]
        extractors.push(Self::pptx());

        extractors
    }
}
