//! PDF content extraction using pdf-extract.

use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::format::FileFormat;
use crate::types::{ContentSource, ExtractedBody, ExtractedContent};
use crate::Extractor;

/// Per-page PDF text extractor using the pdf-extract library.
///
/// Every page is returned, blank ones included, so page numbers stay
/// aligned with the source document.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    /// Strip NUL bytes some producers leave in text runs.
    strip_nul: bool,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor {
    /// Create new PDF extractor with default settings.
    pub fn new() -> Self {
        Self { strip_nul: true }
    }

    /// Extract per-page text from raw PDF bytes.
    pub fn pages_from_bytes(&self, content: &[u8]) -> ExtractResult<Vec<String>> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(content)
            .map_err(|e| ExtractError::malformed(FileFormat::Pdf, e))?;

        if !self.strip_nul {
            return Ok(pages);
        }
        Ok(pages.into_iter().map(|p| p.replace('\0', "")).collect())
    }
}

impl Extractor for PdfExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<ExtractedContent> {
        let content = std::fs::read(path)?;
        let pages = self.pages_from_bytes(&content)?;

        tracing::debug!(path = %path.display(), pages = pages.len(), "Extracted PDF pages");

        let page_count = pages.len();
        Ok(ExtractedContent::new(
            ExtractedBody::Pages(pages),
            ContentSource::Path(path.to_path_buf()),
            self.name(),
        )
        .with_metadata("page_count", page_count)
        .with_metadata("original_size", content.len()))
    }

    fn supported_formats(&self) -> &[FileFormat] {
        &[FileFormat::Pdf]
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}
