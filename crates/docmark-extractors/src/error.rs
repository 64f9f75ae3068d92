//! Extraction error types.

use std::fmt::Display;

use thiserror::Error;

use crate::format::FileFormat;

/// Errors raised while reading a document.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No extractor is registered for the format.
    #[error("No extractor for {0} files")]
    UnsupportedFormat(FileFormat),

    /// The file could not be parsed as the format it claims to be.
    #[error("Malformed {format} file: {message}")]
    Malformed { format: FileFormat, message: String },

    /// An external converter could not run or exited with an error.
    #[error("External converter '{program}' failed: {message}")]
    Command { program: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// A parse failure for `format`.
    pub fn malformed(format: FileFormat, message: impl Display) -> Self {
        Self::Malformed {
            format,
            message: message.to_string(),
        }
    }

    /// A failure of the external program `program`.
    pub fn command(program: impl Into<String>, message: impl Display) -> Self {
        Self::Command {
            program: program.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
