//! Scan runner that wires discovery, extraction and aggregation together.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::coverage::CoverageStats;
use super::{Collector, FileOutcome, FileResult, ScanReport, Walker};
use crate::analysis::{get_analyzer, FileFacts};
use crate::error::ScanError;

/// Options controlling a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Worker threads; `None` uses rayon's global pool.
    pub jobs: Option<usize>,
    /// Extra directory names to prune, on top of hidden and cache dirs.
    pub exclude_dirs: Vec<String>,
}

/// Executes a documentation coverage scan over a directory tree.
pub struct Runner {
    options: ScanOptions,
}

impl Runner {
    /// Create a new runner.
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan `root` and return the aggregated report.
    ///
    /// Only an invalid root (or a worker pool that cannot start) is an
    /// error. Files that cannot be read or parsed are counted as skipped.
    pub fn run<P: AsRef<Path>>(&self, root: P) -> Result<ScanReport, ScanError> {
        let walker = Walker::new(root)?.exclude_dirs(self.options.exclude_dirs.iter().cloned());
        tracing::info!(root = %walker.root().display(), "scanning");

        // Each file is an independent unit of work; the collector below is
        // the only place results meet.
        let outcomes = self.in_pool(|| {
            walker
                .files()
                .par_bridge()
                .map(analyze_file)
                .collect::<Vec<_>>()
        })?;

        let mut collector = Collector::new();
        collector.extend(outcomes);
        let report = collector.finish(walker.root());

        tracing::info!(
            files_scanned = report.files_scanned,
            files_skipped = report.files_skipped,
            total_missing = report.total_missing,
            "scan complete"
        );
        Ok(report)
    }

    fn in_pool<T, F>(&self, work: F) -> Result<T, ScanError>
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        match self.options.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| ScanError::ThreadPool(e.to_string()))?;
                Ok(pool.install(work))
            }
            None => Ok(work()),
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

/// Read, parse and check one file. Never fails: problems become a
/// [`FileOutcome::Skipped`].
pub fn analyze_file(path: PathBuf) -> FileOutcome {
    match extract(&path) {
        Ok(facts) => {
            let stats = CoverageStats::from_facts(&facts);
            let missing = facts.missing().cloned().collect();
            FileOutcome::Analyzed {
                result: FileResult { path, missing },
                stats,
            }
        }
        Err(error) => FileOutcome::Skipped { path, error },
    }
}

fn extract(path: &Path) -> Result<FileFacts, ScanError> {
    // The walker only yields registered extensions.
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let analyzer = get_analyzer(ext).ok_or_else(|| ScanError::Parse {
        path: path.to_path_buf(),
    })?;

    let bytes = fs::read(path).map_err(|source| ScanError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8(bytes).map_err(|_| ScanError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;

    analyzer.extract_facts(path, &source)
}
