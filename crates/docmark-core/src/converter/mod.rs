//! Format dispatch and conversion to Markdown.
//!
//! [`Converter`] inspects a file's extension, asks the extraction pipeline
//! for the matching capability, and turns what comes back into one Markdown
//! string with blank lines and empty rows normalized.

mod legacy;

pub use legacy::{
    ppt_placeholder, CONVERSION_STATUS_HEADER, FILE_INFO_HEADER, TECHNICAL_DETAILS_HEADER,
};

use std::path::Path;
use std::sync::Arc;

use docmark_extractors::{
    CommandConverter, ExtractedBody, ExtractedContent, ExtractionPipeline, FileFormat,
    GenericConverter, Sheet,
};

use crate::config::{AppConfig, EmptyLineConfig};
use crate::error::{DocmarkError, DocmarkResult};
use crate::markdown::strip_frontmatter;
use crate::normalize::{
    ensure_content_kept, is_blank, normalize_lines, NormalizationFailure, EMPTY_LINE_TARGET,
};
use crate::tabular::TabularRenderer;

/// Converts documents to normalized Markdown.
///
/// Holds no per-file state, so one converter can be shared across threads.
#[derive(Clone)]
pub struct Converter {
    pipeline: ExtractionPipeline,
    fallback: Option<Arc<dyn GenericConverter>>,
    config: EmptyLineConfig,
}

impl Converter {
    /// Create a converter with every compiled-in extractor and no fallback.
    pub fn new(config: EmptyLineConfig) -> Self {
        Self {
            pipeline: ExtractionPipeline::with_defaults(),
            fallback: None,
            config,
        }
    }

    /// Replace the extraction pipeline.
    pub fn with_pipeline(mut self, pipeline: ExtractionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Set the converter used when no native extractor applies.
    pub fn with_fallback(mut self, fallback: Arc<dyn GenericConverter>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Create a converter from application settings.
    pub fn from_app_config(config: &AppConfig) -> Self {
        let converter = Self::new(EmptyLineConfig::resolve(Some(config)));
        match config
            .fallback_command
            .as_deref()
            .and_then(CommandConverter::from_command_line)
        {
            Some(command) => converter.with_fallback(Arc::new(command)),
            None => converter,
        }
    }

    pub fn config(&self) -> &EmptyLineConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }

    /// Convert one file to Markdown.
    pub fn convert(&self, path: &Path) -> DocmarkResult<String> {
        let format = FileFormat::from_path(path);
        tracing::info!(path = %path.display(), format = %format, "Converting file");

        if self.config.enabled() {
            tracing::debug!(
                target: EMPTY_LINE_TARGET,
                consecutive = self.config.remove_consecutive(),
                trailing = self.config.remove_trailing(),
                preserve_single = self.config.preserve_single_empty(),
                "Empty line processing enabled"
            );
        } else {
            tracing::debug!(target: EMPTY_LINE_TARGET, "Empty line processing disabled");
        }

        let markdown = match format {
            FileFormat::Markdown => self.convert_markdown(path)?,
            FileFormat::Text => self.convert_text(path)?,
            FileFormat::Docx | FileFormat::Doc => self.convert_document(path, format)?,
            FileFormat::Xlsx | FileFormat::Xlsm | FileFormat::Xls => {
                self.convert_workbook(path, format)?
            }
            FileFormat::Pdf => self.convert_pdf(path)?,
            FileFormat::Pptx => self.convert_presentation(path)?,
            FileFormat::Ppt => ppt_placeholder(path),
            FileFormat::Other => self.convert_other(path)?,
        };

        tracing::info!(
            path = %path.display(),
            format = %format,
            chars = markdown.chars().count(),
            "Conversion finished"
        );
        Ok(markdown)
    }

    fn convert_markdown(&self, path: &Path) -> DocmarkResult<String> {
        let text = std::fs::read_to_string(path)?;
        let (frontmatter, body) = strip_frontmatter(&text);
        if let Some(frontmatter) = frontmatter {
            tracing::debug!(format = %frontmatter.format, "Stripped frontmatter");
        }
        Ok(normalize_lines(&body, &self.config))
    }

    fn convert_text(&self, path: &Path) -> DocmarkResult<String> {
        let bytes = std::fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                if let Some(fallback) = &self.fallback {
                    tracing::info!(
                        path = %path.display(),
                        converter = fallback.name(),
                        "Text is not valid UTF-8, using fallback converter"
                    );
                    return self.run_fallback(fallback.as_ref(), path, FileFormat::Text);
                }
                tracing::warn!(path = %path.display(), "Text is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(normalize_lines(&text, &self.config))
    }

    fn convert_document(&self, path: &Path, format: FileFormat) -> DocmarkResult<String> {
        let content = self
            .extract(path, format)?
            .ok_or_else(|| DocmarkError::dependency(format))?;
        let ExtractedBody::Paragraphs(paragraphs) = content.body else {
            return Err(unexpected_body(path, format, &content));
        };

        let markdown = render_paragraphs(&paragraphs, &self.config);
        tracing::info!(paragraphs = paragraphs.len(), "Document paragraphs extracted");
        Ok(markdown)
    }

    fn convert_workbook(&self, path: &Path, format: FileFormat) -> DocmarkResult<String> {
        let content = self
            .extract(path, format)?
            .ok_or_else(|| DocmarkError::dependency(format))?;
        let ExtractedBody::Sheets(sheets) = content.body else {
            return Err(unexpected_body(path, format, &content));
        };

        let markdown = render_workbook(&sheets, &self.config);
        tracing::info!(sheets = sheets.len(), "Workbook converted");
        Ok(markdown)
    }

    fn convert_pdf(&self, path: &Path) -> DocmarkResult<String> {
        let Some(content) = self.extract(path, FileFormat::Pdf)? else {
            return self.fallback_or_dependency(path, FileFormat::Pdf);
        };
        let ExtractedBody::Pages(pages) = content.body else {
            return Err(unexpected_body(path, FileFormat::Pdf, &content));
        };

        let rendered: Vec<String> = pages
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(idx, text)| format!("## Page {}\n\n{}", idx + 1, text))
            .collect();

        tracing::info!(pages = rendered.len(), total = pages.len(), "PDF converted");
        Ok(rendered.join("\n\n"))
    }

    fn convert_presentation(&self, path: &Path) -> DocmarkResult<String> {
        let Some(content) = self.extract(path, FileFormat::Pptx)? else {
            return self.fallback_or_dependency(path, FileFormat::Pptx);
        };
        let ExtractedBody::Slides(slides) = content.body else {
            return Err(unexpected_body(path, FileFormat::Pptx, &content));
        };

        let rendered: Vec<String> = slides
            .iter()
            .enumerate()
            .filter_map(|(idx, fragments)| {
                let texts: Vec<&str> = fragments
                    .iter()
                    .map(String::as_str)
                    .filter(|t| !t.trim().is_empty())
                    .collect();
                (!texts.is_empty())
                    .then(|| format!("### Slide {}\n\n{}", idx + 1, texts.join("\n\n")))
            })
            .collect();

        tracing::info!(slides = rendered.len(), total = slides.len(), "Presentation converted");
        Ok(rendered.join("\n\n"))
    }

    fn convert_other(&self, path: &Path) -> DocmarkResult<String> {
        match &self.fallback {
            Some(fallback) => {
                tracing::info!(
                    path = %path.display(),
                    converter = fallback.name(),
                    "Unsupported extension, using fallback converter"
                );
                self.run_fallback(fallback.as_ref(), path, FileFormat::Other)
            }
            None => {
                tracing::info!(path = %path.display(), "Unsupported extension, returning path");
                Ok(path.display().to_string())
            }
        }
    }

    /// Run the registered extractor, or `None` when there is none.
    fn extract(&self, path: &Path, format: FileFormat) -> DocmarkResult<Option<ExtractedContent>> {
        let Some(extractor) = self.pipeline.extractor_for(format) else {
            return Ok(None);
        };
        extractor
            .extract(path)
            .map(Some)
            .map_err(|e| DocmarkError::conversion(path, format, e))
    }

    fn fallback_or_dependency(&self, path: &Path, format: FileFormat) -> DocmarkResult<String> {
        match &self.fallback {
            Some(fallback) => {
                tracing::info!(
                    path = %path.display(),
                    converter = fallback.name(),
                    "No native extractor, using fallback converter"
                );
                self.run_fallback(fallback.as_ref(), path, format)
            }
            None => Err(DocmarkError::dependency(format)),
        }
    }

    fn run_fallback(
        &self,
        fallback: &dyn GenericConverter,
        path: &Path,
        format: FileFormat,
    ) -> DocmarkResult<String> {
        fallback
            .convert(path)
            .map_err(|e| DocmarkError::conversion(path, format, e))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(EmptyLineConfig::DEFAULT)
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("pipeline", &self.pipeline)
            .field("fallback", &self.fallback.as_ref().map(|c| c.name().to_string()))
            .field("config", &self.config)
            .finish()
    }
}

fn unexpected_body(path: &Path, format: FileFormat, content: &ExtractedContent) -> DocmarkError {
    DocmarkError::conversion(
        path,
        format,
        format!(
            "extractor '{}' returned {} content",
            content.extractor,
            content.body.kind()
        ),
    )
}

/// Join document paragraphs with blank lines, dropping empty ones.
///
/// With normalization enabled, paragraphs that trim to nothing are dropped;
/// when `remove_consecutive` is off a single `""` stands in for each run of
/// them. Trailing empties go when `remove_trailing` is set. Disabled
/// normalization keeps every paragraph with any text.
pub fn render_paragraphs(paragraphs: &[String], config: &EmptyLineConfig) -> String {
    if !config.enabled() {
        return unfiltered_paragraphs(paragraphs);
    }

    paragraphs_or_unfiltered(paragraphs, try_filter_paragraphs(paragraphs, config))
}

fn paragraphs_or_unfiltered(
    paragraphs: &[String],
    attempt: Result<Vec<&str>, NormalizationFailure>,
) -> String {
    match attempt {
        Ok(kept) => kept.join("\n\n"),
        Err(e) => {
            tracing::warn!(
                target: EMPTY_LINE_TARGET,
                error = %e,
                "Paragraph empty line processing failed, using unfiltered paragraphs"
            );
            unfiltered_paragraphs(paragraphs)
        }
    }
}

/// Non-empty paragraphs joined by a blank line, with no blank-line handling.
fn unfiltered_paragraphs(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn try_filter_paragraphs<'a>(
    paragraphs: &'a [String],
    config: &EmptyLineConfig,
) -> Result<Vec<&'a str>, NormalizationFailure> {
    let mut kept: Vec<&str> = Vec::with_capacity(paragraphs.len());
    let mut prev_empty = false;
    for paragraph in paragraphs {
        let empty = is_blank(paragraph);
        if !empty {
            kept.push(paragraph);
        } else if !config.remove_consecutive() && !prev_empty {
            kept.push("");
        }
        prev_empty = empty;
    }

    if config.remove_trailing() {
        while kept.last().is_some_and(|p| is_blank(p)) {
            kept.pop();
        }
    }

    let expected = paragraphs.iter().filter(|p| !is_blank(p)).count();
    let actual = kept.iter().filter(|p| !is_blank(p)).count();
    ensure_content_kept(expected, actual)?;

    Ok(kept)
}

/// Render every non-empty sheet as `### <name>` plus its grid.
pub fn render_workbook(sheets: &[Sheet], config: &EmptyLineConfig) -> String {
    let renderer = TabularRenderer::new(*config);
    sheets
        .iter()
        .filter(|sheet| !sheet.is_empty())
        .map(|sheet| renderer.render_sheet(sheet))
        .collect::<Vec<_>>()
        .join("\n\n")
}
