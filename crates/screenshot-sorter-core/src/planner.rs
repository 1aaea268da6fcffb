use crate::record::ScreenshotRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Records sharing one normalized package name.
#[derive(Debug)]
pub struct PackageGroup {
    pub package_name: String,
    pub records: Vec<ScreenshotRecord>,
}

impl PackageGroup {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// `{count}_{package_name}`; the count is fixed when the plan is built.
    pub fn folder_name(&self) -> String {
        format!("{}_{}", self.count(), self.package_name)
    }
}

/// Where one screenshot goes, relative to the source folder.
#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub record: ScreenshotRecord,
    pub target_dir: PathBuf,
}

impl PlannedMove {
    pub fn destination(&self, root: &Path) -> PathBuf {
        root.join(&self.target_dir).join(&self.record.file_name)
    }
}

#[derive(Debug, Default)]
pub struct DestinationPlan {
    moves: Vec<PlannedMove>,
    folders: BTreeSet<PathBuf>,
}

impl DestinationPlan {
    pub fn moves(&self) -> &[PlannedMove] {
        &self.moves
    }

    /// Every folder the plan writes into, parents before children.
    pub fn folders(&self) -> impl Iterator<Item = &PathBuf> {
        self.folders.iter()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Partition records by package name. Groups come back sorted by name, records keep their
/// input order.
pub fn group_by_package(records: Vec<ScreenshotRecord>) -> Vec<PackageGroup> {
    let mut groups: BTreeMap<String, Vec<ScreenshotRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.package_name.clone())
            .or_default()
            .push(record);
    }
    groups
        .into_iter()
        .map(|(package_name, records)| PackageGroup {
            package_name,
            records,
        })
        .collect()
}

/// Decide the destination folder of every record.
///
/// A package folder holding more than `max_files_per_folder` records gets one `YYYY-MM`
/// subfolder per capture month.
pub fn plan(records: Vec<ScreenshotRecord>, max_files_per_folder: usize) -> DestinationPlan {
    let mut plan = DestinationPlan::default();

    for group in group_by_package(records) {
        let package_folder = PathBuf::from(group.folder_name());
        plan.folders.insert(package_folder.clone());

        if group.count() <= max_files_per_folder {
            plan.moves
                .extend(group.records.into_iter().map(|record| PlannedMove {
                    record,
                    target_dir: package_folder.clone(),
                }));
            continue;
        }

        debug!(
            "{} has {} files, splitting by month",
            group.package_name,
            group.count()
        );
        let mut months: BTreeMap<String, Vec<ScreenshotRecord>> = BTreeMap::new();
        for record in group.records {
            months.entry(record.month_key()).or_default().push(record);
        }
        for (month, records) in months {
            let month_folder = package_folder.join(month);
            plan.folders.insert(month_folder.clone());
            plan.moves.extend(records.into_iter().map(|record| PlannedMove {
                record,
                target_dir: month_folder.clone(),
            }));
        }
    }

    plan
}

/// Create every folder of the plan under `root`. Existing folders are fine; a folder that
/// cannot be created is logged and skipped. Returns the number of folders now present.
pub fn materialize(root: &Path, plan: &DestinationPlan) -> usize {
    let mut present = 0;
    for folder in plan.folders() {
        let path = root.join(folder);
        match fs::create_dir_all(&path) {
            Ok(()) => present += 1,
            Err(err) => error!("Error creating folder {}: {}", path.display(), err),
        }
    }
    present
}
