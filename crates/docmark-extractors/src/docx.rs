//! DOCX paragraph extraction using docx-rs.
//!
//! Yields the document's top-level paragraphs in order, blank ones
//! included, so the engine can decide how to collapse them. Table cell
//! paragraphs are not part of the body paragraph stream.

use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::format::FileFormat;
use crate::types::{ContentSource, ExtractedBody, ExtractedContent};
use crate::Extractor;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};

/// Paragraph extractor backed by docx-rs.
///
/// Legacy `.doc` files are routed here as well; binary Word 97 files will
/// fail to parse and surface as an extraction error.
#[derive(Debug, Clone)]
pub struct DocxExtractor {
    /// Whether hyperlink runs contribute text.
    include_hyperlinks: bool,
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxExtractor {
    /// Create new DOCX extractor with default settings.
    pub fn new() -> Self {
        Self {
            include_hyperlinks: true,
        }
    }

    /// Configure whether hyperlink text is kept.
    pub fn with_hyperlinks(mut self, include: bool) -> Self {
        self.include_hyperlinks = include;
        self
    }

    /// Parse raw DOCX bytes into paragraph texts.
    pub fn paragraphs_from_bytes(&self, content: &[u8]) -> ExtractResult<Vec<String>> {
        let docx = docx_rs::read_docx(content)
            .map_err(|e| ExtractError::malformed(FileFormat::Docx, e))?;

        let paragraphs = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(self.paragraph_text(p)),
                _ => None,
            })
            .collect();

        Ok(paragraphs)
    }

    /// Extract text from a paragraph.
    fn paragraph_text(&self, p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => Self::push_run_text(r, &mut text),
                ParagraphChild::Hyperlink(h) if self.include_hyperlinks => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            Self::push_run_text(r, &mut text);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    fn push_run_text(run: &docx_rs::Run, text: &mut String) {
        for run_child in &run.children {
            match run_child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }
}

impl Extractor for DocxExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<ExtractedContent> {
        let content = std::fs::read(path)?;
        let paragraphs = self.paragraphs_from_bytes(&content)?;

        tracing::debug!(
            path = %path.display(),
            paragraphs = paragraphs.len(),
            "Extracted DOCX paragraphs"
        );

        Ok(ExtractedContent::new(
            ExtractedBody::Paragraphs(paragraphs),
            ContentSource::Path(path.to_path_buf()),
            self.name(),
        )
        .with_metadata("original_size", content.len()))
    }

    fn supported_formats(&self) -> &[FileFormat] {
        &[FileFormat::Docx, FileFormat::Doc]
    }

    fn name(&self) -> &str {
        "docx-rs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn build_docx(texts: &[&str]) -> Vec<u8> {
        let mut doc = Docx::new();
        for text in texts {
            let mut p = Paragraph::new();
            if !text.is_empty() {
                p = p.add_run(Run::new().add_text(*text));
            }
            doc = doc.add_paragraph(p);
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        doc.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_docx_extractor_creation() {
        let extractor = DocxExtractor::new();
        assert_eq!(extractor.name(), "docx-rs");
        assert!(extractor.supports(FileFormat::Docx));
        assert!(extractor.supports(FileFormat::Doc));
        assert!(!extractor.supports(FileFormat::Pdf));
    }

    #[test]
    fn test_docx_default_keeps_hyperlinks() {
        assert!(DocxExtractor::default().include_hyperlinks);
        assert!(!DocxExtractor::default().with_hyperlinks(false).include_hyperlinks);
    }

    #[test]
    fn test_docx_paragraphs_keep_blank_entries() {
        let bytes = build_docx(&["First", "", "Second"]);
        let paragraphs = DocxExtractor::new().paragraphs_from_bytes(&bytes).unwrap();
        assert_eq!(paragraphs, vec!["First", "", "Second"]);
    }

    #[test]
    fn test_docx_extract_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.docx");
        std::fs::write(&path, build_docx(&["Hello"])).unwrap();

        let content = DocxExtractor::new().extract(&path).unwrap();
        assert_eq!(
            content.body,
            ExtractedBody::Paragraphs(vec!["Hello".to_string()])
        );
        assert_eq!(content.source, ContentSource::Path(path));
    }

    #[test]
    fn test_docx_invalid_bytes() {
        let result = DocxExtractor::new().paragraphs_from_bytes(b"not a zip");
        assert!(matches!(result, Err(ExtractError::Malformed {
                format: FileFormat::Docx,
                ..
            })));
    }
}
