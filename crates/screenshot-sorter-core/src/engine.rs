use crate::annotate::{Annotator, StatusText};
use crate::config::AppConfig;
use crate::error::{AnnotateError, Error, MalformedName};
use crate::planner::{self, DestinationPlan, PlannedMove};
use crate::progress::ProgressReporter;
use crate::record::ScreenshotRecord;
use crate::report;
use crate::scanner;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct OrganizeEngine {
    config: AppConfig,
    annotator: Annotator,
}

#[derive(Debug)]
pub struct IgnoredFile {
    pub file_name: String,
    pub reason: MalformedName,
}

#[derive(Debug)]
pub struct FailedFile {
    pub file_name: String,
    pub reason: AnnotateError,
}

#[derive(Debug)]
pub struct MovedFile {
    pub file_name: String,
    pub destination: PathBuf,
}

/// Everything that happened during one organize run.
#[derive(Debug, Default)]
pub struct OrganizeResult {
    pub source_folder: PathBuf,
    pub files_scanned: usize,
    pub folders_created: usize,
    pub ignored: Vec<IgnoredFile>,
    pub failed: Vec<FailedFile>,
    pub moved: Vec<MovedFile>,
    pub scan_duration: Duration,
    pub process_duration: Duration,
}

impl OrganizeResult {
    pub fn ignored_names(&self) -> Vec<&str> {
        self.ignored.iter().map(|f| f.file_name.as_str()).collect()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.file_name.as_str()).collect()
    }
}

/// The plan a run would execute, computed without touching any file.
#[derive(Debug)]
pub struct Preview {
    pub source_folder: PathBuf,
    pub files_scanned: usize,
    pub plan: DestinationPlan,
    pub ignored: Vec<IgnoredFile>,
}

impl OrganizeEngine {
    pub fn new(config: AppConfig) -> Self {
        let annotator = Annotator::new(config.status_bar.clone());
        Self { config, annotator }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn with_source_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.config.source_folder = folder.into();
        self
    }

    /// Scan, parse and plan without creating, writing or deleting anything.
    pub fn preview(&self) -> Result<Preview, Error> {
        let source = self.validated_source()?;
        let files = scanner::list_files(source);
        let files_scanned = files.len();
        let (records, ignored) = parse_all(&files);
        let plan = planner::plan(records, self.config.max_files_per_folder);

        Ok(Preview {
            source_folder: source.to_path_buf(),
            files_scanned,
            plan,
            ignored,
        })
    }

    /// Run the full pipeline over the source folder:
    /// 1. List regular files (non-recursive)
    /// 2. Parse file names; the ones that do not qualify are logged in one error line
    /// 3. Plan destinations and create the folders
    /// 4. Stamp each screenshot into its destination, then delete the original
    ///
    /// Only a missing source folder is an error; per-file problems end up in the result.
    pub fn organize(&self, reporter: &dyn ProgressReporter) -> Result<OrganizeResult, Error> {
        let source = self.validated_source()?;
        info!("Organizing screenshots in {}", source.display());

        // Phase 1: Scan and parse
        let scan_start = Instant::now();
        let files = scanner::list_files(source);
        let files_scanned = files.len();
        let (records, ignored) = parse_all(&files);
        report::log_ignored(&ignored);
        let scan_duration = scan_start.elapsed();
        reporter.on_scan_complete(files_scanned, scan_duration.as_secs_f64());
        reporter.on_parse_complete(records.len(), ignored.len());
        debug!(
            "Scan completed in {:.2}s, {} files, {} screenshots, {} ignored",
            scan_duration.as_secs_f64(),
            files_scanned,
            records.len(),
            ignored.len(),
        );

        // Phase 2: Plan
        let plan = planner::plan(records, self.config.max_files_per_folder);
        let folders_created = planner::materialize(source, &plan);

        // Phase 3: Annotate and move
        let process_start = Instant::now();
        reporter.on_process_start(plan.len());
        let mut moved = Vec::new();
        let mut failed = Vec::new();
        for planned in plan.moves() {
            let file_name = planned.record.file_name.clone();
            match self.process_file(source, planned) {
                Ok(destination) => {
                    info!("Moved {} to {}", file_name, planned.target_dir.display());
                    reporter.on_file_moved(&file_name, &destination);
                    moved.push(MovedFile {
                        file_name,
                        destination,
                    });
                }
                Err(reason) => {
                    debug!("Failed to process {}: {}", file_name, reason);
                    reporter.on_file_failed(&file_name, &reason);
                    failed.push(FailedFile { file_name, reason });
                }
            }
        }
        let process_duration = process_start.elapsed();
        reporter.on_process_complete(moved.len(), failed.len(), process_duration.as_secs_f64());

        Ok(OrganizeResult {
            source_folder: source.to_path_buf(),
            files_scanned,
            folders_created,
            ignored,
            failed,
            moved,
            scan_duration,
            process_duration,
        })
    }

    fn validated_source(&self) -> Result<&Path, Error> {
        let source = self.config.source_folder.as_path();
        if !source.is_dir() {
            return Err(Error::SourceFolderMissing(source.to_path_buf()));
        }
        Ok(source)
    }

    /// Annotate into the destination, then remove the original. The original is only
    /// removed after the destination has been written.
    fn process_file(&self, root: &Path, planned: &PlannedMove) -> Result<PathBuf, AnnotateError> {
        let record = &planned.record;
        let destination = planned.destination(root);
        let text = status_text(record);

        self.annotator
            .annotate(&record.source_path, &destination, &text)?;

        fs::remove_file(&record.source_path).map_err(|err| AnnotateError::RemoveOriginal {
            path: record.source_path.clone(),
            source: err,
        })?;

        Ok(destination)
    }
}

pub fn status_text(record: &ScreenshotRecord) -> StatusText {
    StatusText {
        time: record.time_text(),
        date: record.date_text(),
        package: record.package_name.clone(),
    }
}

fn parse_all(files: &[PathBuf]) -> (Vec<ScreenshotRecord>, Vec<IgnoredFile>) {
    let mut records = Vec::new();
    let mut ignored = Vec::new();

    for path in files {
        match ScreenshotRecord::from_path(path) {
            Ok(record) => records.push(record),
            Err(reason) => {
                debug!("{}", reason);
                ignored.push(IgnoredFile {
                    file_name: path
                        .file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    reason,
                });
            }
        }
    }

    (records, ignored)
}
