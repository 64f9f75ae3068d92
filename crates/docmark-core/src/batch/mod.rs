//! Batch conversion of an input folder.
//!
//! [`BatchRunner`] walks the configured input folder, converts every changed
//! file, backs up the Markdown, pushes it to the uploader and records the
//! outcome with the change tracker. One file failing never stops the batch.

mod discover;
mod local;

pub use discover::discover_files;
pub use local::{
    AlwaysChanged, DirectoryBackupStore, JsonFileTracker, MarkdownDirectory, METADATA_FILE_NAME,
    OUTPUT_INDEX_FILE_NAME,
};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::converter::Converter;
use crate::error::DocmarkResult;
use crate::markdown::extract_title;
use crate::traits::{
    BackupStore, ChangeTracker, ProcessingStatus, UploadMetadata, UploadResponse, Uploader,
};

/// Days of backups kept after a run.
pub const DEFAULT_BACKUP_RETENTION_DAYS: u32 = 30;

/// Options for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Process every file, ignoring the change tracker.
    pub force: bool,
    /// Backups older than this are removed after the run.
    pub backup_retention_days: u32,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            force: false,
            backup_retention_days: DEFAULT_BACKUP_RETENTION_DAYS,
        }
    }
}

/// Counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Files discovered.
    pub total: usize,
    /// Files selected for processing.
    pub processed: usize,
    /// Files skipped because they did not change.
    pub skipped_unchanged: usize,
    pub successes: usize,
    pub failures: usize,
    pub backups_created: usize,
    pub orphans_removed: usize,
    pub backups_removed: usize,
}

/// Drives conversion, backup, upload and tracking for an input folder.
pub struct BatchRunner {
    config: AppConfig,
    converter: Converter,
    tracker: Box<dyn ChangeTracker>,
    backups: Box<dyn BackupStore>,
    uploader: Box<dyn Uploader>,
    options: BatchOptions,
}

impl BatchRunner {
    /// Create a runner; the converter is built from `config`.
    pub fn new(
        config: AppConfig,
        tracker: Box<dyn ChangeTracker>,
        backups: Box<dyn BackupStore>,
        uploader: Box<dyn Uploader>,
    ) -> Self {
        Self {
            converter: Converter::from_app_config(&config),
            config,
            tracker,
            backups,
            uploader,
            options: BatchOptions::default(),
        }
    }

    /// Replace the converter.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the batch.
    ///
    /// Fails only when the input folder cannot be scanned. Per-file errors
    /// are counted in the summary and recorded with the tracker.
    pub fn run(&mut self) -> DocmarkResult<BatchSummary> {
        let input = self.config.input_folder.clone();
        let all_files = discover_files(&input, &self.config.file_extensions)?;

        let to_process: Vec<PathBuf> = if self.options.force {
            tracing::info!(total = all_files.len(), "Processing all files (force mode)");
            all_files.clone()
        } else {
            all_files
                .iter()
                .filter(|path| self.is_changed(path))
                .cloned()
                .collect()
        };

        let mut summary = BatchSummary {
            total: all_files.len(),
            processed: to_process.len(),
            skipped_unchanged: all_files.len() - to_process.len(),
            ..BatchSummary::default()
        };
        tracing::info!(
            total = summary.total,
            to_process = summary.processed,
            skipped_unchanged = summary.skipped_unchanged,
            "Filtered input files"
        );

        if to_process.is_empty() {
            tracing::info!("No files need processing");
        }

        for path in &to_process {
            match self.process_file(path, &input, &mut summary) {
                Ok(response) => {
                    summary.successes += 1;
                    tracing::info!(
                        path = %path.display(),
                        document_id = ?response.document_id,
                        "Uploaded"
                    );
                }
                Err(e) => {
                    summary.failures += 1;
                    if let Err(track_err) =
                        self.tracker
                            .update_metadata(path, ProcessingStatus::Error, None)
                    {
                        tracing::debug!(error = %track_err, "Failed to record error status");
                    }
                    tracing::error!(
                        path = %path.display(),
                        error = %e,
                        code = e.code().as_str(),
                        "Failed to process file"
                    );
                }
            }
        }

        self.cleanup_metadata(&all_files, &mut summary);
        self.cleanup_backups(&mut summary);

        tracing::info!(
            successes = summary.successes,
            failures = summary.failures,
            backups_created = summary.backups_created,
            "Batch finished"
        );
        Ok(summary)
    }

    fn is_changed(&self, path: &Path) -> bool {
        self.tracker.is_file_changed(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Change check failed, processing file");
            true
        })
    }

    fn process_file(
        &mut self,
        path: &Path,
        input: &Path,
        summary: &mut BatchSummary,
    ) -> DocmarkResult<UploadResponse> {
        let markdown = self.converter.convert(path)?;

        match self.backups.backup_markdown(path, &markdown, input) {
            Ok(backup) => {
                summary.backups_created += 1;
                tracing::info!(source = %path.display(), backup = %backup.display(), "Backup created");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Backup failed, continuing");
            }
        }

        let extracted_title = extract_title(&markdown);
        let title = extracted_title.clone().unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let metadata = UploadMetadata {
            source_path: path.to_path_buf(),
            extracted_title,
            dataset_id: Some(self.config.dataset_id.clone()).filter(|id| !id.is_empty()),
        };

        let response = self.uploader.push_markdown(
            &title,
            &markdown,
            &metadata,
            self.config.chunk_settings,
        )?;

        self.tracker.update_metadata(
            path,
            ProcessingStatus::Success,
            response.document_id.clone(),
        )?;
        Ok(response)
    }

    fn cleanup_metadata(&mut self, all_files: &[PathBuf], summary: &mut BatchSummary) {
        match self.tracker.get_all_metadata() {
            Ok(entries) => {
                for path in entries.keys().filter(|p| !p.exists()) {
                    tracing::info!(path = %path.display(), "Tracked file was deleted");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to read tracked metadata"),
        }

        match self.tracker.cleanup_orphaned_metadata(all_files) {
            Ok(removed) => {
                summary.orphans_removed = removed;
                if removed > 0 {
                    tracing::info!(removed, "Removed orphaned metadata entries");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Metadata cleanup failed"),
        }
    }

    fn cleanup_backups(&mut self, summary: &mut BatchSummary) {
        match self.backups.backup_stats() {
            Ok(stats) => tracing::info!(
                files = stats.total_files,
                bytes = stats.total_bytes,
                "Backup statistics"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to read backup statistics"),
        }

        match self
            .backups
            .cleanup_old_backups(self.options.backup_retention_days)
        {
            Ok(removed) => {
                summary.backups_removed = removed;
                if removed > 0 {
                    tracing::info!(removed, "Removed old backups");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Backup cleanup failed"),
        }
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("input_folder", &self.config.input_folder)
            .field("converter", &self.converter)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn local_runner(input: &Path, output: &Path, backups: &Path) -> BatchRunner {
        let config = AppConfig {
            input_folder: input.to_path_buf(),
            backup_folder: backups.to_path_buf(),
            ..AppConfig::default()
        };
        BatchRunner::new(
            config,
            Box::new(AlwaysChanged),
            Box::new(DirectoryBackupStore::new(backups)),
            Box::new(MarkdownDirectory::new(output)),
        )
    }

    #[test]
    fn test_run_with_local_collaborators() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let backups = tempfile::tempdir().unwrap();
        fs::write(input.path().join("guide.md"), "# Guide\n\n\n\nStep one\n\n").unwrap();
        fs::write(input.path().join("plain.txt"), "line\n\n\nline two").unwrap();
        fs::write(input.path().join("ignored.png"), "x").unwrap();

        let summary = local_runner(input.path(), output.path(), backups.path())
            .run()
            .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 0);
        assert_eq!(summary.backups_created, 2);

        assert_eq!(
            fs::read_to_string(output.path().join("Guide.md")).unwrap(),
            "# Guide\n\nStep one"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("plain.md")).unwrap(),
            "line\n\nline two"
        );
    }

    #[test]
    fn test_failure_does_not_stop_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let backups = tempfile::tempdir().unwrap();
        fs::write(input.path().join("a.md"), "alpha").unwrap();
        fs::write(input.path().join("broken.xlsx"), "not a workbook").unwrap();
        fs::write(input.path().join("c.md"), "gamma").unwrap();

        let summary = local_runner(input.path(), output.path(), backups.path())
            .run()
            .unwrap();

        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 1);
        assert!(output.path().join("a.md").exists());
        assert!(output.path().join("c.md").exists());
    }

    #[test]
    fn test_same_name_in_subfolders_kept_apart() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let backups = tempfile::tempdir().unwrap();
        fs::create_dir_all(input.path().join("a")).unwrap();
        fs::create_dir_all(input.path().join("b")).unwrap();
        fs::write(input.path().join("a/notes.txt"), "alpha").unwrap();
        fs::write(input.path().join("b/notes.txt"), "beta").unwrap();

        let summary = local_runner(input.path(), output.path(), backups.path())
            .with_options(BatchOptions {
                force: true,
                ..BatchOptions::default()
            })
            .run()
            .unwrap();

        assert_eq!(summary.successes, 2);
        assert_eq!(
            fs::read_to_string(output.path().join("notes.md")).unwrap(),
            "alpha"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("notes-2.md")).unwrap(),
            "beta"
        );
    }

    #[test]
    fn test_missing_input_folder() {
        let output = tempfile::tempdir().unwrap();
        let mut runner = local_runner(
            Path::new("/nonexistent/docmark-input"),
            output.path(),
            output.path(),
        );
        assert!(runner.run().is_err());
    }

    #[test]
    fn test_options_default() {
        let options = BatchOptions::default();
        assert!(!options.force);
        assert_eq!(options.backup_retention_days, 30);
    }
}
