//! Extraction pipeline for routing files to the matching extractor.

use std::path::Path;
use std::sync::Arc;

use crate::error::{ExtractError, ExtractResult};
use crate::format::FileFormat;
use crate::types::ExtractedContent;
use crate::Extractor;

/// Set of registered format capabilities.
///
/// The first registered extractor that supports a format wins, so custom
/// extractors added before the defaults override them.
#[derive(Clone)]
pub struct ExtractionPipeline {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractionPipeline {
    /// Create new empty pipeline.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create pipeline with all available extractors.
    pub fn with_defaults() -> Self {
        Self {
            extractors: crate::ExtractorFactory::all(),
        }
    }

    /// Add an extractor to the pipeline.
    pub fn add_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Find the extractor registered for a format.
    pub fn extractor_for(&self, format: FileFormat) -> Option<&Arc<dyn Extractor>> {
        self.extractors.iter().find(|e| e.supports(format))
    }

    /// Extract content using the extractor registered for the format.
    pub fn extract(&self, path: &Path, format: FileFormat) -> ExtractResult<ExtractedContent> {
        match self.extractor_for(format) {
            Some(extractor) => extractor.extract(path),
            None => Err(ExtractError::UnsupportedFormat(format)),
        }
    }

    /// Check if pipeline can handle a given format.
    pub fn supports(&self, format: FileFormat) -> bool {
        self.extractor_for(format).is_some()
    }

    /// List all supported formats.
    pub fn supported_formats(&self) -> Vec<FileFormat> {
        let mut formats: Vec<FileFormat> = Vec::new();
        for format in self
            .extractors
            .iter()
            .flat_map(|e| e.supported_formats().iter().copied())
        {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }

    /// Get the number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if the pipeline has no registered extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.extractors.iter().map(|e| e.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentSource, ExtractedBody};

    struct StubExtractor;

    impl Extractor for StubExtractor {
        fn extract(&self, path: &Path) -> ExtractResult<ExtractedContent> {
            Ok(ExtractedContent::new(
                ExtractedBody::Pages(vec!["stub".into()]),
                ContentSource::Path(path.to_path_buf()),
                self.name(),
            ))
        }

        fn supported_formats(&self) -> &[FileFormat] {
            &[FileFormat::Pdf]
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = ExtractionPipeline::with_defaults();

        #[cfg(feature = "pdf")]
        assert!(pipeline.supports(FileFormat::Pdf));

        #[cfg(feature = "docx")]
        assert!(pipeline.supports(FileFormat::Doc));

        assert!(!pipeline.supports(FileFormat::Ppt));
    }

    #[test]
    fn test_pipeline_empty() {
        let pipeline = ExtractionPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);
        assert!(pipeline.supported_formats().is_empty());
    }

    #[test]
    fn test_pipeline_unsupported_type_error() {
        let pipeline = ExtractionPipeline::new();
        let result = pipeline.extract(Path::new("a.pdf"), FileFormat::Pdf);
        assert!(matches!(result, Err(ExtractError::UnsupportedFormat(FileFormat::Pdf))));
    }

    #[test]
    fn test_first_registered_extractor_wins() {
        let pipeline = ExtractionPipeline::new()
            .add_extractor(Arc::new(StubExtractor))
            .add_extractor(crate::ExtractorFactory::for_format(FileFormat::Pdf)
                .unwrap_or_else(|_| Arc::new(StubExtractor)));

        let content = pipeline.extract(Path::new("a.pdf"), FileFormat::Pdf).unwrap();
        assert_eq!(content.extractor, "stub");
        assert_eq!(pipeline.supported_formats(), vec![FileFormat::Pdf]);
    }
}
