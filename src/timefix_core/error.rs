use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimefixError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("No files to process")]
    NoFiles,

    // Configuration errors
    #[error("No EXIF extractor available")]
    NoExtractor,

    // Metadata errors
    #[error("Date parsing error: {0}")]
    InvalidDateFormat(String),

    // Write-back errors
    #[error("Failed to set timestamp on {path}: {source}")]
    CommitFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for timefix operations.
pub type Result<T> = std::result::Result<T, TimefixError>;
