//! PPTX slide text extraction using zip + quick-xml.
//!
//! A slide deck is a zip archive with one `ppt/slides/slideN.xml` part per
//! slide. For every shape (`p:sp`) carrying a text body, the shape's
//! paragraphs are joined with newlines into one fragment.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{ExtractError, ExtractResult};
use crate::format::FileFormat;
use crate::types::{ContentSource, ExtractedBody, ExtractedContent};
use crate::Extractor;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";

/// Slide deck extractor.
#[derive(Debug, Clone, Default)]
pub struct PptxExtractor;

impl PptxExtractor {
    /// Create new PPTX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Read per-slide shape texts from the deck at `path`, in slide order.
    pub fn slides(&self, path: &Path) -> ExtractResult<Vec<Vec<String>>> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| ExtractError::malformed(FileFormat::Pptx, e))?;

        let mut slide_parts: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| slide_index(name).map(|idx| (idx, name.to_string())))
            .collect();
        slide_parts.sort_by_key(|(idx, _)| *idx);

        let mut slides = Vec::with_capacity(slide_parts.len());
        for (_, name) in slide_parts {
            let mut part = archive.by_name(&name).map_err(|e| {
                ExtractError::malformed(FileFormat::Pptx, format!("{}: {}", name, e))
            })?;
            let mut xml = String::new();
            part.read_to_string(&mut xml)?;
            slides.push(shape_texts(&xml)?);
        }

        Ok(slides)
    }
}

/// Numeric index of a slide part name, `None` for any other archive entry.
fn slide_index(name: &str) -> Option<u32> {
    name.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(SLIDE_SUFFIX)?
        .parse()
        .ok()
}

#[derive(Default)]
struct ShapeText {
    paragraphs: Vec<String>,
    current: Option<String>,
    has_text_body: bool,
}

/// Collect the text of every text-bearing shape in a slide part.
fn shape_texts(xml: &str) -> ExtractResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<ShapeText> = Vec::new();
    let mut shapes = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => stack.push(ShapeText::default()),
                b"txBody" => {
                    if let Some(shape) = stack.last_mut() {
                        shape.has_text_body = true;
                    }
                }
                b"p" => {
                    if let Some(shape) = stack.last_mut() {
                        shape.current = Some(String::new());
                    }
                }
                b"t" => in_text = true,
                b"br" => push_break(&mut stack),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"br" => push_break(&mut stack),
                b"p" => {
                    if let Some(shape) = stack.last_mut() {
                        shape.paragraphs.push(String::new());
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::malformed(FileFormat::Pptx, e))?;
                if let Some(current) = stack.last_mut().and_then(|s| s.current.as_mut()) {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(shape) = stack.last_mut() {
                        if let Some(paragraph) = shape.current.take() {
                            shape.paragraphs.push(paragraph);
                        }
                    }
                }
                b"sp" => {
                    if let Some(shape) = stack.pop() {
                        if shape.has_text_body {
                            shapes.push(shape.paragraphs.join("\n"));
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::malformed(
                    FileFormat::Pptx,
                    format!("slide XML at {}: {}", reader.buffer_position(), e),
                ))
            }
            _ => {}
        }
    }

    Ok(shapes)
}

fn push_break(stack: &mut [ShapeText]) {
    if let Some(current) = stack.last_mut().and_then(|s| s.current.as_mut()) {
        current.push('\n');
    }
}

impl Extractor for PptxExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<ExtractedContent> {
        let slides = self.slides(path)?;

        tracing::debug!(path = %path.display(), slides = slides.len(), "Extracted slide deck");

        let slide_count = slides.len();
        Ok(ExtractedContent::new(
            ExtractedBody::Slides(slides),
            ContentSource::Path(path.to_path_buf()),
            self.name(),
        )
        .with_metadata("slide_count", slide_count))
    }

    fn supported_formats(&self) -> &[FileFormat] {
        &[FileFormat::Pptx]
    }

    fn name(&self) -> &str {
        "pptx-xml"
    }
}
