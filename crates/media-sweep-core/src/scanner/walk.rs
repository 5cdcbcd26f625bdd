use super::exclusion::{is_always_skipped, ExclusionSet};
use crate::error::Error;
use crate::normalize::file_key;
use crate::progress::ProgressReporter;
use crate::reference::ReferenceSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const PROGRESS_EVERY: usize = 500;

/// A regular file under the media root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileEntry {
    /// `/`-separated path relative to the media root, original casing.
    pub relative: String,
    pub absolute: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    /// Every file that survived the skip and exclusion rules, sorted.
    pub all_files: Vec<FileEntry>,
    /// Surviving files with no reference in the data store, sorted.
    pub candidates: Vec<FileEntry>,
}

impl ScanResult {
    pub fn candidate_paths(&self) -> Vec<&str> {
        self.candidates.iter().map(|f| f.relative.as_str()).collect()
    }
}

/// Single depth-first pass over `root`.
///
/// Failure to read the root itself is fatal; unreadable entries below it are
/// logged and skipped. Symlinks are not followed.
pub fn scan_media_tree(
    root: &Path,
    references: &ReferenceSet,
    exclusions: &ExclusionSet,
    reporter: &dyn ProgressReporter,
) -> Result<ScanResult, Error> {
    let mut result = ScanResult::default();
    let mut seen = 0usize;

    for entry_result in WalkDir::new(root).follow_links(false) {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(Error::Walk(err)),
            Err(err) => {
                let denied = err
                    .io_error()
                    .map(|e| e.kind() == io::ErrorKind::PermissionDenied)
                    .unwrap_or(false);
                if denied {
                    warn!("Access denied under media root: {}", err);
                } else {
                    warn!("Skipping unreadable entry: {}", err);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match relative_path(root, entry.path()) {
            Some(relative) => relative,
            None => continue,
        };

        seen += 1;
        if seen % PROGRESS_EVERY == 0 {
            reporter.on_scan_progress(seen, &relative);
        }

        if is_always_skipped(&relative) || exclusions.is_excluded(&relative) {
            debug!("Skipping {}", relative);
            continue;
        }

        let file = FileEntry {
            relative,
            absolute: entry.path().to_path_buf(),
        };
        if !references.contains_key(&file_key(&file.relative)) {
            result.candidates.push(file.clone());
        }
        result.all_files.push(file);
    }

    result.all_files.sort();
    result.candidates.sort();
    Ok(result)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = stripped
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
