//! Error taxonomy for a scan.
//!
//! Only [`ScanError::RootNotFound`] and [`ScanError::ThreadPool`] ever leave
//! the runner. The per-file variants are absorbed where they occur and turn
//! the file into a skipped outcome.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning a tree.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("directory '{}' does not exist", path.display())]
    RootNotFound { path: PathBuf },
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8", path.display())]
    InvalidEncoding { path: PathBuf },
    #[error("syntax error in {}", path.display())]
    Parse { path: PathBuf },
    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}
