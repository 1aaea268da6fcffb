use crate::engine::{IgnoredFile, OrganizeResult};
use crate::error::Error;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

/// The single error line naming every file rejected by the filename parser.
pub fn ignored_line(ignored: &[IgnoredFile]) -> Option<String> {
    if ignored.is_empty() {
        return None;
    }
    let names: Vec<&str> = ignored.iter().map(|f| f.file_name.as_str()).collect();
    Some(format!(
        "The following files were ignored due to invalid naming: {}",
        names.join(", ")
    ))
}

/// Emitted by the engine as soon as parsing finishes.
pub fn log_ignored(ignored: &[IgnoredFile]) {
    if let Some(line) = ignored_line(ignored) {
        error!("{}", line);
    }
}

/// Log the outcome of a finished run: the failed files and the counts. Ignored files have
/// already been reported by [`log_ignored`] during the run.
pub fn log_summary(result: &OrganizeResult) {
    if !result.failed.is_empty() {
        error!("Failed to process {}", result.failed_names().join(", "));
    }
    info!(
        "{} files scanned, {} moved, {} ignored, {} failed",
        result.files_scanned,
        result.moved.len(),
        result.ignored.len(),
        result.failed.len(),
    );
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Moved,
    Ignored,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub file_name: String,
    pub outcome: Outcome,
    pub destination: String,
    pub reason: String,
}

/// One row per file the run looked at, moved files first.
pub fn rows(result: &OrganizeResult) -> Vec<ReportRow> {
    let moved = result.moved.iter().map(|f| ReportRow {
        file_name: f.file_name.clone(),
        outcome: Outcome::Moved,
        destination: f.destination.to_string_lossy().into_owned(),
        reason: String::new(),
    });
    let ignored = result.ignored.iter().map(|f| ReportRow {
        file_name: f.file_name.clone(),
        outcome: Outcome::Ignored,
        destination: String::new(),
        reason: f.reason.to_string(),
    });
    let failed = result.failed.iter().map(|f| ReportRow {
        file_name: f.file_name.clone(),
        outcome: Outcome::Failed,
        destination: String::new(),
        reason: format!("{}: {}", f.reason.stage(), f.reason),
    });
    moved.chain(ignored).chain(failed).collect()
}

pub fn write_csv(result: &OrganizeResult, path: &Path) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows(result) {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
