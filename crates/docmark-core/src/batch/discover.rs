use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{DocmarkError, DocmarkResult};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|configured| configured.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Find every file under `root` whose extension is in `extensions`.
///
/// Matching is case-insensitive. Hidden files and directories are skipped.
/// The result is sorted.
pub fn discover_files(root: &Path, extensions: &[String]) -> DocmarkResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(DocmarkError::configuration(
            "input_folder",
            root.display(),
            "is not a directory",
        ));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && has_extension(path, extensions) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    tracing::info!(root = %root.display(), files = files.len(), "Discovered input files");
    Ok(files)
}
