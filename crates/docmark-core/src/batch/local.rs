//! Local collaborator implementations.
//!
//! These let a batch run without remote services: a tracker that treats
//! everything as changed, a JSON file tracker, a dated backup directory and
//! an uploader that writes Markdown files.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use walkdir::WalkDir;

use crate::config::ChunkSettings;
use crate::error::{DocmarkError, DocmarkResult};
use crate::traits::{
    BackupStats, BackupStore, ChangeTracker, FileMetadata, ProcessingStatus, UploadMetadata,
    UploadResponse, Uploader,
};

/// File name of the tracker store inside the input folder.
pub const METADATA_FILE_NAME: &str = ".file_metadata.json";

const BACKUP_DATE_FORMAT: &str = "%Y%m%d";

/// Tracker that reports every file as changed and stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysChanged;

impl ChangeTracker for AlwaysChanged {
    fn is_file_changed(&self, _path: &Path) -> DocmarkResult<bool> {
        Ok(true)
    }

    fn update_metadata(
        &mut self,
        _path: &Path,
        _status: ProcessingStatus,
        _document_id: Option<String>,
    ) -> DocmarkResult<()> {
        Ok(())
    }

    fn get_all_metadata(&self) -> DocmarkResult<BTreeMap<PathBuf, FileMetadata>> {
        Ok(BTreeMap::new())
    }

    fn cleanup_orphaned_metadata(&mut self, _valid_paths: &[PathBuf]) -> DocmarkResult<usize> {
        Ok(0)
    }
}

/// Tracker persisting size and modification time per file in a JSON file.
///
/// A file counts as changed when it has no entry, when its last run failed,
/// or when its size or modification time differ from the recorded ones.
#[derive(Debug, Clone)]
pub struct JsonFileTracker {
    store: PathBuf,
    entries: BTreeMap<PathBuf, FileMetadata>,
}

impl JsonFileTracker {
    /// Open (or start) the store at `store`.
    pub fn open(store: impl Into<PathBuf>) -> DocmarkResult<Self> {
        let store = store.into();
        let entries = if store.exists() {
            let content = std::fs::read_to_string(&store)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { store, entries })
    }

    /// Open the store kept inside an input folder.
    pub fn in_folder(input_folder: &Path) -> DocmarkResult<Self> {
        Self::open(input_folder.join(METADATA_FILE_NAME))
    }

    pub fn store_path(&self) -> &Path {
        &self.store
    }

    fn save(&self) -> DocmarkResult<()> {
        if let Some(parent) = self.store.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.store, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

fn fingerprint(path: &Path) -> DocmarkResult<(u64, Option<DateTime<Utc>>)> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
    Ok((metadata.len(), modified))
}

impl ChangeTracker for JsonFileTracker {
    fn is_file_changed(&self, path: &Path) -> DocmarkResult<bool> {
        let Some(entry) = self.entries.get(path) else {
            return Ok(true);
        };
        if entry.status == ProcessingStatus::Error {
            return Ok(true);
        }
        let (size, modified) = fingerprint(path)?;
        Ok(entry.size != size || entry.modified != modified)
    }

    fn update_metadata(
        &mut self,
        path: &Path,
        status: ProcessingStatus,
        document_id: Option<String>,
    ) -> DocmarkResult<()> {
        let (size, modified) = fingerprint(path).unwrap_or((0, None));
        self.entries.insert(
            path.to_path_buf(),
            FileMetadata {
                status,
                document_id,
                size,
                modified,
                updated_at: Utc::now(),
            },
        );
        self.save()
    }

    fn get_all_metadata(&self) -> DocmarkResult<BTreeMap<PathBuf, FileMetadata>> {
        Ok(self.entries.clone())
    }

    fn cleanup_orphaned_metadata(&mut self, valid_paths: &[PathBuf]) -> DocmarkResult<usize> {
        let valid: HashSet<&PathBuf> = valid_paths.iter().collect();
        let before = self.entries.len();
        self.entries.retain(|path, _| valid.contains(path));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }
}

/// Backup store writing `<root>/<YYYYMMDD>/<relative path>.md`.
#[derive(Debug, Clone)]
pub struct DirectoryBackupStore {
    root: PathBuf,
}

impl DirectoryBackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dated subdirectories of the root.
    fn dated_dirs(&self) -> DocmarkResult<Vec<(NaiveDate, PathBuf)>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            if let Some(date) = name
                .to_str()
                .and_then(|n| NaiveDate::parse_from_str(n, BACKUP_DATE_FORMAT).ok())
            {
                dirs.push((date, entry.path()));
            }
        }
        Ok(dirs)
    }
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

impl BackupStore for DirectoryBackupStore {
    fn backup_markdown(
        &self,
        source_path: &Path,
        markdown: &str,
        base_folder: &Path,
    ) -> DocmarkResult<PathBuf> {
        let relative = match source_path.strip_prefix(base_folder) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => source_path
                .file_name()
                .map(PathBuf::from)
                .ok_or_else(|| {
                    DocmarkError::collaborator(format!(
                        "cannot back up {}: no file name",
                        source_path.display()
                    ))
                })?,
        };

        let mut file_name = relative.as_os_str().to_os_string();
        file_name.push(".md");
        let dated = self
            .root
            .join(Local::now().format(BACKUP_DATE_FORMAT).to_string());
        let target = dated.join(file_name);

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, markdown)?;
        Ok(target)
    }

    fn cleanup_old_backups(&self, days_to_keep: u32) -> DocmarkResult<usize> {
        let cutoff = Local::now().date_naive() - Duration::days(i64::from(days_to_keep));
        let mut removed = 0;
        for (date, dir) in self.dated_dirs()? {
            if date < cutoff {
                removed += count_files(&dir);
                std::fs::remove_dir_all(&dir)?;
                tracing::debug!(dir = %dir.display(), "Removed expired backups");
            }
        }
        Ok(removed)
    }

    fn backup_stats(&self) -> DocmarkResult<BackupStats> {
        let mut stats = BackupStats::default();
        if !self.root.is_dir() {
            return Ok(stats);
        }
        for entry in WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            stats.total_files += 1;
            stats.total_bytes += metadata.len();
            if let Some(modified) = metadata.modified().ok().map(DateTime::<Utc>::from) {
                stats.oldest = Some(stats.oldest.map_or(modified, |o| o.min(modified)));
                stats.newest = Some(stats.newest.map_or(modified, |n| n.max(modified)));
            }
        }
        Ok(stats)
    }
}

/// File name of the output index inside a [`MarkdownDirectory`].
pub const OUTPUT_INDEX_FILE_NAME: &str = ".docmark_outputs.json";

/// Uploader writing each document to `<dir>/<title>.md`.
///
/// Output names are owned by the source file that first claimed them, as
/// recorded in [`OUTPUT_INDEX_FILE_NAME`]. A document from another source
/// with the same title gets `<title>-2.md`, `<title>-3.md` and so on. A file
/// already present but missing from the index is never overwritten.
#[derive(Debug)]
pub struct MarkdownDirectory {
    dir: PathBuf,
    /// Output file name to source path, loaded on first push.
    owners: Mutex<Option<BTreeMap<String, PathBuf>>>,
}

impl MarkdownDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            owners: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(OUTPUT_INDEX_FILE_NAME)
    }

    fn load_owners(&self) -> DocmarkResult<BTreeMap<String, PathBuf>> {
        let index = self.index_path();
        if !index.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&index)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Pick the output file name for `source`, recording the claim.
    fn claim_file_name(&self, stem: &str, source: &Path) -> DocmarkResult<String> {
        let mut guard = self
            .owners
            .lock()
            .map_err(|_| DocmarkError::collaborator("output index lock poisoned"))?;
        if guard.is_none() {
            *guard = Some(self.load_owners()?);
        }
        let Some(owners) = guard.as_mut() else {
            return Err(DocmarkError::collaborator("output index not loaded"));
        };

        let mut attempt = 1usize;
        loop {
            let file_name = if attempt == 1 {
                format!("{stem}.md")
            } else {
                format!("{stem}-{attempt}.md")
            };
            match owners.get(&file_name) {
                Some(owner) if owner == source => return Ok(file_name),
                Some(_) => {}
                None if self.dir.join(&file_name).exists() => {}
                None => {
                    owners.insert(file_name.clone(), source.to_path_buf());
                    std::fs::write(self.index_path(), serde_json::to_string_pretty(&*owners)?)?;
                    return Ok(file_name);
                }
            }
            attempt += 1;
        }
    }
}

/// Make a title usable as a file name.
fn file_stem_for(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

impl Uploader for MarkdownDirectory {
    fn push_markdown(
        &self,
        title: &str,
        markdown: &str,
        metadata: &UploadMetadata,
        chunk_settings: Option<ChunkSettings>,
    ) -> DocmarkResult<UploadResponse> {
        std::fs::create_dir_all(&self.dir)?;
        let file_name = self.claim_file_name(&file_stem_for(title), &metadata.source_path)?;
        let target = self.dir.join(&file_name);
        std::fs::write(&target, markdown)?;

        tracing::debug!(
            file = %target.display(),
            source = %metadata.source_path.display(),
            chunk = ?chunk_settings.map(|c| c.max_chunk_length()),
            "Wrote Markdown document"
        );

        let mut response = UploadResponse::with_document_id(file_name);
        response.extra.insert(
            "path".into(),
            serde_json::Value::String(target.display().to_string()),
        );
        Ok(response)
    }
}
