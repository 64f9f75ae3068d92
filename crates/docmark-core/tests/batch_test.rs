//! Batch runner tests with mocked collaborators.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use docmark_core::traits::{
    BackupStats, BackupStore, ChangeTracker, FileMetadata, ProcessingStatus, UploadMetadata,
    UploadResponse, Uploader,
};
use docmark_core::{
    AppConfig, BatchOptions, BatchRunner, ChunkSettings, DocmarkError, DocmarkResult,
};
use mockall::mock;
use mockall::predicate::eq;

mock! {
    pub Tracker {}

    impl ChangeTracker for Tracker {
        fn is_file_changed(&self, path: &Path) -> DocmarkResult<bool>;
        fn update_metadata(
            &mut self,
            path: &Path,
            status: ProcessingStatus,
            document_id: Option<String>,
        ) -> DocmarkResult<()>;
        fn get_all_metadata(&self) -> DocmarkResult<BTreeMap<PathBuf, FileMetadata>>;
        fn cleanup_orphaned_metadata(&mut self, valid_paths: &[PathBuf]) -> DocmarkResult<usize>;
    }
}

mock! {
    pub Backups {}

    impl BackupStore for Backups {
        fn backup_markdown(
            &self,
            source_path: &Path,
            markdown: &str,
            base_folder: &Path,
        ) -> DocmarkResult<PathBuf>;
        fn cleanup_old_backups(&self, days_to_keep: u32) -> DocmarkResult<usize>;
        fn backup_stats(&self) -> DocmarkResult<BackupStats>;
    }
}

mock! {
    pub Upload {}

    impl Uploader for Upload {
        fn push_markdown(
            &self,
            title: &str,
            markdown: &str,
            metadata: &UploadMetadata,
            chunk_settings: Option<ChunkSettings>,
        ) -> DocmarkResult<UploadResponse>;
    }
}

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> AppConfig {
        AppConfig {
            input_folder: self.dir.path().to_path_buf(),
            file_extensions: vec![".md".into(), ".txt".into()],
            ..AppConfig::default()
        }
    }
}

fn quiet_backups(expected_backups: usize) -> MockBackups {
    let mut backups = MockBackups::new();
    backups
        .expect_backup_markdown()
        .times(expected_backups)
        .returning(|source, _, _| Ok(source.with_extension("bak")));
    backups
        .expect_backup_stats()
        .returning(|| Ok(BackupStats::default()));
    backups
        .expect_cleanup_old_backups()
        .with(eq(30))
        .times(1)
        .returning(|_| Ok(0));
    backups
}

fn tracker_cleanup(tracker: &mut MockTracker, removed: usize) {
    tracker
        .expect_get_all_metadata()
        .returning(|| Ok(BTreeMap::new()));
    tracker
        .expect_cleanup_orphaned_metadata()
        .times(1)
        .returning(move |_| Ok(removed));
}

#[test]
fn test_only_changed_files_are_processed() {
    let fixture = Fixture::new(&[("a.md", "# Alpha\n\nbody"), ("b.md", "unchanged")]);
    let changed = fixture.path("a.md");

    let mut tracker = MockTracker::new();
    let changed_clone = changed.clone();
    tracker
        .expect_is_file_changed()
        .returning(move |path| Ok(path == changed_clone.as_path()));
    tracker
        .expect_update_metadata()
        .withf(move |path, status, id| {
            path.to_path_buf() == changed
                && *status == ProcessingStatus::Success
                && id.as_deref() == Some("doc-1")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    tracker_cleanup(&mut tracker, 1);

    let mut uploader = MockUpload::new();
    uploader
        .expect_push_markdown()
        .withf(|title, markdown, metadata, chunk| {
            title.to_string() == "Alpha"
                && markdown.to_string() == "# Alpha\n\nbody"
                && metadata.extracted_title.as_deref() == Some("Alpha")
                && metadata.dataset_id.is_none()
                && chunk.is_none()
        })
        .times(1)
        .returning(|_, _, _, _| Ok(UploadResponse::with_document_id("doc-1")));

    let summary = BatchRunner::new(
        fixture.config(),
        Box::new(tracker),
        Box::new(quiet_backups(1)),
        Box::new(uploader),
    )
    .run()
    .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped_unchanged, 1);
    assert_eq!(summary.successes, 1);
    assert_eq!(summary.backups_created, 1);
    assert_eq!(summary.orphans_removed, 1);
}

#[test]
fn test_force_ignores_tracker() {
    let fixture = Fixture::new(&[("a.md", "a"), ("b.txt", "b")]);

    let mut tracker = MockTracker::new();
    tracker.expect_is_file_changed().never();
    tracker
        .expect_update_metadata()
        .times(2)
        .returning(|_, _, _| Ok(()));
    tracker_cleanup(&mut tracker, 0);

    let mut uploader = MockUpload::new();
    uploader
        .expect_push_markdown()
        .times(2)
        .returning(|_, _, _, _| Ok(UploadResponse::default()));

    let summary = BatchRunner::new(
        fixture.config(),
        Box::new(tracker),
        Box::new(quiet_backups(2)),
        Box::new(uploader),
    )
    .with_options(BatchOptions {
        force: true,
        ..BatchOptions::default()
    })
    .run()
    .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.successes, 2);
}

#[test]
fn test_upload_failure_records_error_and_continues() {
    let fixture = Fixture::new(&[("a.md", "first"), ("b.md", "second")]);
    let failing = fixture.path("a.md");

    let mut tracker = MockTracker::new();
    tracker.expect_is_file_changed().returning(|_| Ok(true));
    let failing_clone = failing.clone();
    tracker
        .expect_update_metadata()
        .withf(move |path, status, _| {
            path.to_path_buf() == failing_clone && *status == ProcessingStatus::Error
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    tracker
        .expect_update_metadata()
        .withf(|_, status, _| *status == ProcessingStatus::Success)
        .times(1)
        .returning(|_, _, _| Ok(()));
    tracker_cleanup(&mut tracker, 0);

    let mut uploader = MockUpload::new();
    uploader
        .expect_push_markdown()
        .returning(move |_, _, metadata, _| {
            if metadata.source_path == failing {
                Err(DocmarkError::collaborator("service unavailable"))
            } else {
                Ok(UploadResponse::with_document_id("doc-2"))
            }
        });

    let summary = BatchRunner::new(
        fixture.config(),
        Box::new(tracker),
        Box::new(quiet_backups(2)),
        Box::new(uploader),
    )
    .run()
    .unwrap();

    assert_eq!(summary.successes, 1);
    assert_eq!(summary.failures, 1);
}

#[test]
fn test_backup_failure_does_not_block_upload() {
    let fixture = Fixture::new(&[("notes.txt", "text")]);

    let mut tracker = MockTracker::new();
    tracker.expect_is_file_changed().returning(|_| Ok(true));
    tracker
        .expect_update_metadata()
        .times(1)
        .returning(|_, _, _| Ok(()));
    tracker_cleanup(&mut tracker, 0);

    let mut backups = MockBackups::new();
    backups
        .expect_backup_markdown()
        .returning(|_, _, _| Err(DocmarkError::collaborator("disk full")));
    backups
        .expect_backup_stats()
        .returning(|| Err(DocmarkError::collaborator("disk full")));
    backups.expect_cleanup_old_backups().returning(|_| Ok(0));

    let mut uploader = MockUpload::new();
    uploader
        .expect_push_markdown()
        .withf(|title, _, _, _| title.to_string() == "notes")
        .times(1)
        .returning(|_, _, _, _| Ok(UploadResponse::default()));

    let summary = BatchRunner::new(
        fixture.config(),
        Box::new(tracker),
        Box::new(backups),
        Box::new(uploader),
    )
    .run()
    .unwrap();

    assert_eq!(summary.successes, 1);
    assert_eq!(summary.backups_created, 0);
}

#[test]
fn test_dataset_and_chunk_settings_forwarded() {
    let fixture = Fixture::new(&[("doc.md", "content")]);
    let config = AppConfig {
        dataset_id: "ds-42".into(),
        chunk_settings: Some(ChunkSettings::new(1000, 50).unwrap()),
        ..fixture.config()
    };

    let mut tracker = MockTracker::new();
    tracker.expect_is_file_changed().returning(|_| Ok(true));
    tracker
        .expect_update_metadata()
        .returning(|_, _, _| Ok(()));
    tracker_cleanup(&mut tracker, 0);

    let mut uploader = MockUpload::new();
    uploader
        .expect_push_markdown()
        .withf(|_, _, metadata, chunk| {
            metadata.dataset_id.as_deref() == Some("ds-42")
                && metadata.extracted_title.is_none()
                && chunk.map(|c| c.max_chunk_length()) == Some(1000)
        })
        .times(1)
        .returning(|_, _, _, _| Ok(UploadResponse::default()));

    let summary = BatchRunner::new(
        config,
        Box::new(tracker),
        Box::new(quiet_backups(1)),
        Box::new(uploader),
    )
    .run()
    .unwrap();

    assert_eq!(summary.successes, 1);
}

#[test]
fn test_cleanup_failures_are_not_fatal() {
    let fixture = Fixture::new(&[]);

    let mut tracker = MockTracker::new();
    tracker
        .expect_get_all_metadata()
        .returning(|| Err(DocmarkError::collaborator("store locked")));
    tracker
        .expect_cleanup_orphaned_metadata()
        .returning(|_| Err(DocmarkError::collaborator("store locked")));

    let mut backups = MockBackups::new();
    backups
        .expect_backup_stats()
        .returning(|| Ok(BackupStats::default()));
    backups
        .expect_cleanup_old_backups()
        .returning(|_| Err(DocmarkError::collaborator("permission denied")));

    let mut uploader = MockUpload::new();
    uploader.expect_push_markdown().never();

    let summary = BatchRunner::new(
        fixture.config(),
        Box::new(tracker),
        Box::new(backups),
        Box::new(uploader),
    )
    .run()
    .unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(summary.orphans_removed, 0);
    assert_eq!(summary.backups_removed, 0);
}
