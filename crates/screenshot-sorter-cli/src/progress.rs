use indicatif::{ProgressBar, ProgressStyle};
use screenshot_sorter_core::{AnnotateError, ProgressReporter};
use std::path::Path;
use std::sync::Mutex;

/// CLI progress reporter: a bar over the annotate-and-move phase.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
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
    fn on_scan_complete(&self, files_found: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files in {:.2}s",
            files_found, duration_secs
        );
    }

    fn on_parse_complete(&self, records: usize, ignored: usize) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m {} screenshots recognised, {} ignored",
            records, ignored
        );
    }

    fn on_process_start(&self, total_files: usize) {
        let pb = ProgressBar::new(total_files as u64);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} Stamping [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    fn on_file_moved(&self, _file_name: &str, _destination: &Path) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_file_failed(&self, _file_name: &str, _error: &AnnotateError) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_process_complete(&self, moved: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Processing complete: {} moved, {} failed in {:.2}s",
            moved, failed, duration_secs
        );
    }
}
