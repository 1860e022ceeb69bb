//! Core types for scan results.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use super::coverage::CoverageStats;
use crate::analysis::Declaration;
use crate::error::ScanError;

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Undocumented declarations of one file, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub missing: Vec<Declaration>,
}

/// What a worker hands to the collector for one discovered file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was read and parsed. `result.missing` may be empty.
    Analyzed {
        result: FileResult,
        stats: CoverageStats,
    },
    /// The file was unreadable or did not parse.
    Skipped { path: PathBuf, error: ScanError },
}

/// Aggregated result of a whole scan.
///
/// `files` holds only files with at least one finding, ordered by
/// ascending path.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    #[serde(serialize_with = "serialize_path")]
    pub root: PathBuf,
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub declarations_scanned: usize,
    pub documented: usize,
    pub total_missing: usize,
    pub coverage_percent: f64,
    pub passed: bool,
    pub files: Vec<FileResult>,
}

impl ScanReport {
    /// Iterate over every finding in report order.
    pub fn findings(&self) -> impl Iterator<Item = (&Path, &Declaration)> {
        self.files
            .iter()
            .flat_map(|f| f.missing.iter().map(move |d| (f.path.as_path(), d)))
    }
}
