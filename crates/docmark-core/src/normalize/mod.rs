//! Blank line and empty table row normalization.
//!
//! Both normalizers fail open: an internal fault is logged on
//! [`EMPTY_LINE_TARGET`] and the caller gets its input back unchanged.
//! [`NormalizationFailure`] never leaves this crate.

mod lines;
mod table;

pub use lines::{is_blank, normalize_lines};
pub use table::{is_empty_table_line, normalize_table_lines};

pub(crate) use table::try_normalize_table_lines;

use thiserror::Error;

/// Tracing target for normalization decisions and fail-open warnings.
pub const EMPTY_LINE_TARGET: &str = "docmark::empty_line";

/// Internal fault raised when a normalization pass breaks its own contract.
#[derive(Debug, Error)]
pub(crate) enum NormalizationFailure {
    /// A non-blank line was lost or reordered.
    #[error("content lines changed: expected {expected}, got {actual}")]
    ContentChanged { expected: usize, actual: usize },

    /// Row bookkeeping does not add up.
    #[error("row counts inconsistent: {processed} kept + {skipped} skipped != {original}")]
    CountMismatch {
        original: usize,
        processed: usize,
        skipped: usize,
    },

    /// The header or divider line went missing.
    #[error("table header lost during normalization")]
    HeaderLost,
}

/// Fail unless a pass kept every non-blank line.
pub(crate) fn ensure_content_kept(
    expected: usize,
    actual: usize,
) -> Result<(), NormalizationFailure> {
    if expected == actual {
        Ok(())
    } else {
        Err(NormalizationFailure::ContentChanged { expected, actual })
    }
}
