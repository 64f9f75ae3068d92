//! Change tracker trait and related types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DocmarkResult;

/// Outcome recorded for a processed file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcessingStatus {
    Success,
    Error,
}

/// What the tracker remembers about one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub status: ProcessingStatus,
    /// Identifier returned by the uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// File size when last processed.
    pub size: u64,
    /// File modification time when last processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// When this entry was written.
    pub updated_at: DateTime<Utc>,
}

/// Core ChangeTracker trait - decides which files need processing.
pub trait ChangeTracker: Send + Sync {
    /// Whether the file changed since it was last processed.
    fn is_file_changed(&self, path: &Path) -> DocmarkResult<bool>;

    /// Record the outcome of processing a file.
    fn update_metadata(
        &mut self,
        path: &Path,
        status: ProcessingStatus,
        document_id: Option<String>,
    ) -> DocmarkResult<()>;

    /// Every recorded entry.
    fn get_all_metadata(&self) -> DocmarkResult<BTreeMap<PathBuf, FileMetadata>>;

    /// Drop entries whose path is not in `valid_paths`; returns how many.
    fn cleanup_orphaned_metadata(&mut self, valid_paths: &[PathBuf]) -> DocmarkResult<usize>;
}
