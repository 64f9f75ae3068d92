//! Backup store trait and related types.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DocmarkResult;

/// Summary of what a backup store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStats {
    pub total_files: usize,
    pub total_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest: Option<DateTime<Utc>>,
}

/// Core BackupStore trait - keeps a copy of every produced Markdown document.
pub trait BackupStore: Send + Sync {
    /// Store `markdown` for `source_path`, keyed by its location relative to
    /// `base_folder`. Returns where the copy was written.
    fn backup_markdown(
        &self,
        source_path: &Path,
        markdown: &str,
        base_folder: &Path,
    ) -> DocmarkResult<PathBuf>;

    /// Remove backups older than `days_to_keep` days; returns how many.
    fn cleanup_old_backups(&self, days_to_keep: u32) -> DocmarkResult<usize>;

    /// Current store statistics.
    fn backup_stats(&self) -> DocmarkResult<BackupStats>;
}
