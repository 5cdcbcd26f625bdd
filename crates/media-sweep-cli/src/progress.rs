use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use media_sweep_core::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Collect phase: spinner naming the last finished source
/// - Scan phase: spinner (file count unknown upfront)
/// - Delete phase: progress bar over the candidate list
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICKS);
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_collect_start(&self) {
        self.set_bar(Self::spinner("Collecting references..."));
    }

    fn on_source_complete(&self, source: &str, values: usize, references: usize) {
        self.with_bar(|pb| {
            pb.set_message(format!(
                "Collecting references... {} done ({} values, +{} paths)",
                source, values, references
            ))
        });
    }

    fn on_collect_complete(&self, references: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Collected {} referenced paths in {:.2}s",
            "✓".green(),
            references,
            duration_secs
        );
    }

    fn on_scan_start(&self) {
        self.set_bar(Self::spinner("Scanning media files..."));
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &str) {
        self.with_bar(|pb| pb.set_message(format!("Scanning... {} files found", files_found)));
    }

    fn on_scan_complete(&self, total_files: usize, candidates: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  {} Scan complete: {} files, {} unreferenced in {:.2}s",
            "✓".green(),
            total_files,
            candidates,
            duration_secs
        );
    }

    fn on_delete_start(&self, candidates: usize) {
        let pb = ProgressBar::new(candidates as u64);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} Deleting [{bar:30.cyan/dim}] {pos}/{len} files",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars(TICKS);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_delete_progress(&self, processed: usize, _total: usize) {
        self.with_bar(|pb| pb.set_position(processed as u64));
    }

    fn on_delete_complete(&self, deleted: usize, errors: usize) {
        self.finish_bar();
        let mark = if errors == 0 { "✓".green() } else { "✗".red() };
        eprintln!(
            "  {} Deletion complete: {} deleted, {} errors",
            mark, deleted, errors
        );
    }
}
