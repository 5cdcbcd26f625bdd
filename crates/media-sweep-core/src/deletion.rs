use crate::progress::ProgressReporter;
use crate::scanner::{ExclusionSet, FileEntry};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Filesystem primitives the deletion pass needs.
pub trait FileRemover {
    fn exists(&self, path: &Path) -> io::Result<bool>;
    fn is_file(&self, path: &Path) -> io::Result<bool>;
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// [`FileRemover`] over `std::fs`.
pub struct LocalFs;

impl FileRemover for LocalFs {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn is_file(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::symlink_metadata(path)?.file_type().is_file())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for DeletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.path, self.message)
    }
}

#[derive(Debug, Default, Clone)]
pub struct DeletionReport {
    pub deleted: usize,
    /// Candidates that were excluded, gone, or no longer regular files.
    pub skipped: usize,
    pub errors: Vec<DeletionError>,
}

impl DeletionReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Deletes `candidates` one at a time through their walked absolute paths.
/// Exclusions are checked again per file and a path outside `root` is refused.
/// A missing file is skipped without an error; any other failure is recorded
/// and the batch continues.
pub fn delete_candidates(
    root: &Path,
    candidates: &[FileEntry],
    exclusions: &ExclusionSet,
    remover: &dyn FileRemover,
    reporter: &dyn ProgressReporter,
) -> DeletionReport {
    let mut report = DeletionReport::default();
    reporter.on_delete_start(candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        reporter.on_delete_progress(index + 1, candidates.len());

        if exclusions.is_excluded(&candidate.relative) {
            debug!("Excluded at deletion time: {}", candidate.relative);
            report.skipped += 1;
            continue;
        }

        if !candidate.absolute.starts_with(root) {
            warn!("Refusing to delete outside the media root: {}", candidate.absolute.display());
            report.errors.push(DeletionError {
                path: candidate.relative.clone(),
                message: "outside the media root".to_string(),
            });
            continue;
        }

        match try_remove(remover, &candidate.absolute) {
            Ok(true) => {
                debug!("Deleted {}", candidate.relative);
                report.deleted += 1;
            }
            Ok(false) => {
                debug!("No longer a regular file, skipping: {}", candidate.relative);
                report.skipped += 1;
            }
            Err(err) => {
                warn!("Failed to delete {}: {}", candidate.relative, err);
                report.errors.push(DeletionError {
                    path: candidate.relative.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    info!(
        "Deletion finished: {} deleted, {} skipped, {} errors",
        report.deleted,
        report.skipped,
        report.errors.len()
    );
    reporter.on_delete_complete(report.deleted, report.errors.len());
    report
}

fn try_remove(remover: &dyn FileRemover, path: &Path) -> io::Result<bool> {
    if !remover.exists(path)? || !remover.is_file(path)? {
        return Ok(false);
    }
    match remover.remove(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
