use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

/// Regular files directly inside `dir`, sorted by file name. Subdirectories (including the
/// package folders of earlier runs) are not descended into.
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                error!("Error reading entry in directory {}: {}", dir.display(), err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}
