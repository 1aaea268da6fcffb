use crate::error::AnnotateError;
use std::path::Path;

/// Trait for reporting organize progress.
///
/// The CLI implements it with an indicatif progress bar. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_complete(&self, _files_found: usize, _duration_secs: f64) {}
    fn on_parse_complete(&self, _records: usize, _ignored: usize) {}
    fn on_process_start(&self, _total_files: usize) {}
    fn on_file_moved(&self, _file_name: &str, _destination: &Path) {}
    fn on_file_failed(&self, _file_name: &str, _error: &AnnotateError) {}
    fn on_process_complete(&self, _moved: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
