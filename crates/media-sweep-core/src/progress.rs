/// Trait for reporting sweep progress.
///
/// The CLI implements it with indicatif; tests and library callers use
/// [`SilentReporter`]. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_collect_start(&self) {}
    fn on_source_complete(&self, _source: &str, _values: usize, _references: usize) {}
    fn on_collect_complete(&self, _references: usize, _duration_secs: f64) {}
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _total_files: usize, _candidates: usize, _duration_secs: f64) {}
    fn on_delete_start(&self, _candidates: usize) {}
    fn on_delete_progress(&self, _processed: usize, _total: usize) {}
    fn on_delete_complete(&self, _deleted: usize, _errors: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
