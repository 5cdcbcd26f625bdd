use crate::error::Error;
use std::fs;
use std::path::PathBuf;

/// The configured storage root. Resolution is checked each time it is
/// requested so a root that vanished between phases is reported, not walked.
#[derive(Debug, Clone)]
pub struct MediaRoot {
    path: PathBuf,
}

impl MediaRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Absolute directory to walk.
    pub fn for_listing(&self) -> Result<PathBuf, Error> {
        self.resolve()
    }

    /// Absolute directory to delete under. Fails when the directory is read-only.
    pub fn for_deletion(&self) -> Result<PathBuf, Error> {
        let resolved = self.resolve()?;
        let metadata = fs::metadata(&resolved)?;
        if metadata.permissions().readonly() {
            return Err(self.unusable("directory is read-only"));
        }
        Ok(resolved)
    }

    fn resolve(&self) -> Result<PathBuf, Error> {
        let resolved = fs::canonicalize(&self.path)
            .map_err(|e| self.unusable(&e.to_string()))?;
        if !resolved.is_dir() {
            return Err(self.unusable("not a directory"));
        }
        Ok(resolved)
    }

    fn unusable(&self, reason: &str) -> Error {
        Error::MediaRoot {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
