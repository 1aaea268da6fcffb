use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The folder {} does not exist.", .0.display())]
    SourceFolderMissing(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),
}

/// Why a filename was excluded from the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedName {
    #[error("Filename '{0}' does not match the expected pattern")]
    PatternMismatch(String),

    #[error("Invalid date extracted from filename '{file_name}': {reason}")]
    InvalidTimestamp { file_name: String, reason: String },
}

/// Per-file failure while stamping or relocating a screenshot.
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Error opening image {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Error encoding image for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Error writing {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Wrote {} but could not remove original: {source}", path.display())]
    RemoveOriginal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnnotateError {
    /// Short stage label used in reports.
    pub fn stage(&self) -> &'static str {
        match self {
            AnnotateError::Open { .. } => "open",
            AnnotateError::Encode { .. } => "encode",
            AnnotateError::Persist { .. } => "persist",
            AnnotateError::RemoveOriginal { .. } => "remove-original",
        }
    }
}
