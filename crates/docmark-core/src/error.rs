//! Error types for docmark operations.
//!
//! Configuration and dependency errors are fatal for the call that raised
//! them; conversion errors carry the source path and extension so a batch
//! can report the file and move on. Normalization faults never surface here
//! (see [`crate::normalize`]).

use std::path::{Path, PathBuf};

use docmark_extractors::FileFormat;
use thiserror::Error;

/// Result type alias for docmark operations.
pub type DocmarkResult<T> = Result<T, DocmarkError>;

/// Main error type for all docmark operations.
#[derive(Error, Debug)]
pub enum DocmarkError {
    /// A configuration value failed validation.
    #[error("Configuration error: {field} {message} (got {value})")]
    Configuration {
        field: String,
        value: String,
        message: String,
    },

    /// The configuration file could not be found or parsed.
    #[error("Configuration file error: {0}")]
    ConfigFile(String),

    /// No extraction capability is registered for the format.
    #[error("Missing dependency: {library} is required to convert {extension} files")]
    Dependency { extension: String, library: String },

    /// Extraction failed for one file.
    #[error("Failed to convert {} ({extension}): {source}", .path.display())]
    Conversion {
        path: PathBuf,
        extension: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An external collaborator (tracker, backup, uploader) failed.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgInvalidValue,
    CfgFile,

    // Dependency (DEP_xxx)
    DepMissing,

    // Conversion (CONV_xxx)
    ConvFailed,

    // Collaborators (COL_xxx)
    ColFailed,

    // IO / serialization
    Io,
    Serialization,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgInvalidValue => "CFG_001",
            ErrorCode::CfgFile => "CFG_002",
            ErrorCode::DepMissing => "DEP_001",
            ErrorCode::ConvFailed => "CONV_001",
            ErrorCode::ColFailed => "COL_001",
            ErrorCode::Io => "IO_001",
            ErrorCode::Serialization => "SER_001",
        }
    }
}

impl DocmarkError {
    /// Create a configuration error for one field.
    pub fn configuration(
        field: impl Into<String>,
        value: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            field: field.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Create a dependency error for a format without a registered extractor.
    pub fn dependency(format: FileFormat) -> Self {
        Self::Dependency {
            extension: format.to_string(),
            library: format
                .required_library()
                .unwrap_or("a generic converter")
                .to_string(),
        }
    }

    /// Wrap an extraction failure with the file it happened on.
    pub fn conversion(
        path: &Path,
        format: FileFormat,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Conversion {
            path: path.to_path_buf(),
            extension: format.to_string(),
            source: source.into(),
        }
    }

    /// Create a collaborator error.
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator(message.into())
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::CfgInvalidValue,
            Self::ConfigFile(_) => ErrorCode::CfgFile,
            Self::Dependency { .. } => ErrorCode::DepMissing,
            Self::Conversion { .. } => ErrorCode::ConvFailed,
            Self::Collaborator(_) => ErrorCode::ColFailed,
            Self::Io(_) => ErrorCode::Io,
            Self::Serialization(_) => ErrorCode::Serialization,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Configuration { .. } | Self::ConfigFile(_) => {
                Some("Please check the configuration file values")
            }
            Self::Dependency { .. } => {
                Some("Enable the matching extractor feature or configure a fallback converter")
            }
            _ => None,
        }
    }
}
