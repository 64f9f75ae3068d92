//! Closed set of recognized input formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Input format, decided by file extension (case-insensitive).
///
/// Anything not listed maps to [`FileFormat::Other`], which the engine hands
/// to the generic converter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Markdown, optionally with a frontmatter block.
    #[strum(serialize = "md")]
    Markdown,
    /// Plain UTF-8 text.
    #[strum(serialize = "txt")]
    Text,
    /// Office Open XML word processing document.
    #[strum(serialize = "docx")]
    Docx,
    /// Legacy word processing document.
    #[strum(serialize = "doc")]
    Doc,
    /// Office Open XML workbook.
    #[strum(serialize = "xlsx")]
    Xlsx,
    /// Macro-enabled workbook.
    #[strum(serialize = "xlsm")]
    Xlsm,
    /// Legacy BIFF workbook.
    #[strum(serialize = "xls")]
    Xls,
    /// Portable Document Format.
    #[strum(serialize = "pdf")]
    Pdf,
    /// Office Open XML slide deck.
    #[strum(serialize = "pptx")]
    Pptx,
    /// Legacy slide deck (placeholder output only).
    #[strum(serialize = "ppt")]
    Ppt,
    /// Unrecognized extension.
    #[strum(serialize = "")]
    Other,
}

impl FileFormat {
    /// Resolve a format from an extension with or without the leading dot.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        if ext.is_empty() {
            return FileFormat::Other;
        }
        ext.parse().unwrap_or(FileFormat::Other)
    }

    /// Resolve a format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileFormat::Other)
    }

    /// Bare lowercase extension (`""` for [`FileFormat::Other`]).
    pub fn extension(self) -> &'static str {
        self.into()
    }

    /// Library that backs the native extractor for this format, if any.
    pub fn required_library(self) -> Option<&'static str> {
        match self {
            FileFormat::Docx | FileFormat::Doc => Some("docx-rs"),
            FileFormat::Xlsx | FileFormat::Xlsm | FileFormat::Xls => Some("calamine"),
            FileFormat::Pdf => Some("pdf-extract"),
            FileFormat::Pptx => Some("zip + quick-xml"),
            FileFormat::Markdown | FileFormat::Text | FileFormat::Ppt | FileFormat::Other => None,
        }
    }

    /// Whether this is one of the workbook formats.
    pub fn is_spreadsheet(self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xlsm | FileFormat::Xls)
    }

    /// Every recognized format, in declaration order.
    pub fn known() -> Vec<FileFormat> {
        Self::iter().filter(|f| *f != FileFormat::Other).collect()
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Other => f.write_str("other"),
            format => write!(f, ".{}", format.extension()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(FileFormat::from_extension("XLSX"), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_extension(".Md"), FileFormat::Markdown);
        assert_eq!(FileFormat::from_extension("ppt"), FileFormat::Ppt);
    }

    #[test]
    fn test_unknown_extension_is_other() {
        assert_eq!(FileFormat::from_extension("csv"), FileFormat::Other);
        assert_eq!(FileFormat::from_extension(""), FileFormat::Other);
        assert_eq!(FileFormat::from_path(Path::new("README")), FileFormat::Other);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            FileFormat::from_path(Path::new("/data/Report.PDF")),
            FileFormat::Pdf
        );
        assert_eq!(
            FileFormat::from_path(Path::new("deck.pptx")),
            FileFormat::Pptx
        );
    }

    #[test]
    fn test_required_library() {
        assert_eq!(FileFormat::Doc.required_library(), Some("docx-rs"));
        assert_eq!(FileFormat::Xls.required_library(), Some("calamine"));
        assert_eq!(FileFormat::Ppt.required_library(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FileFormat::Xlsm.to_string(), ".xlsm");
        assert_eq!(FileFormat::Other.to_string(), "other");
        assert_eq!(FileFormat::known().len(), 10);
    }
}
