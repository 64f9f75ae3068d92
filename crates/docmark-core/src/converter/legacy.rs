use std::path::Path;

use chrono::{DateTime, Local};

pub const FILE_INFO_HEADER: &str = "## File information";
pub const CONVERSION_STATUS_HEADER: &str = "## Conversion status";
pub const TECHNICAL_DETAILS_HEADER: &str = "## Technical details";

/// Describe a legacy `.ppt` deck that cannot be extracted.
///
/// Reads only filesystem metadata, so it works for unreadable or missing
/// files too.
pub fn ppt_placeholder(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let metadata = std::fs::metadata(path).ok();
    let size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .map(|t| {
            DateTime::<Local>::from(t)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "Unknown".to_string());

    tracing::warn!(file = %file_name, "Legacy .ppt format is not supported directly");

    format!(
        "# PowerPoint file (legacy format)

{FILE_INFO_HEADER}
- **File name**: {file_name}
- **File size**: {size} bytes
- **Last modified**: {modified}
- **Format**: Microsoft PowerPoint 97-2003 (.ppt)

{CONVERSION_STATUS_HEADER}
This file uses the legacy PowerPoint format (.ppt), which does not support
automatic text extraction. To make its content available, try one of:

1. Open the file in Microsoft PowerPoint and save it again as .pptx
2. Open the file in LibreOffice Impress and save it as .pptx or .odp
3. Convert it to a current format with another conversion tool

{TECHNICAL_DETAILS_HEADER}
- Detected format: OLE compound document
- Supported by: none of the built-in extractors
- Recommended action: convert the file, then process it again
"
    )
}
