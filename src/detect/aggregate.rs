//! Single-writer collection of per-file outcomes into a report.

use std::path::Path;

use super::coverage::CoverageStats;
use super::{FileOutcome, FileResult, ScanReport};

/// Buffers worker outcomes and produces a deterministic report.
///
/// Outcomes may arrive in any order. Nothing is emitted until
/// [`Collector::finish`], which sorts by path, so the report does not
/// depend on worker scheduling.
#[derive(Debug, Default)]
pub struct Collector {
    files_scanned: usize,
    files_skipped: usize,
    stats: CoverageStats,
    results: Vec<FileResult>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one file's outcome.
    pub fn submit(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Analyzed { result, stats } => {
                self.files_scanned += 1;
                self.stats.merge(stats);
                if !result.missing.is_empty() {
                    self.results.push(result);
                }
            }
            FileOutcome::Skipped { path, error } => {
                tracing::debug!(path = %path.display(), %error, "skipping file");
                self.files_skipped += 1;
            }
        }
    }

    /// Sort buffered results by path and build the final report.
    ///
    /// Paths are ordered component by component (`Path` ordering), the same
    /// order the walker discovers them in. That is lexicographic over the
    /// sequence of path segments rather than over the rendered string, so
    /// `a/x.py` sorts before `a-b.py`.
    pub fn finish(mut self, root: &Path) -> ScanReport {
        self.results.sort_by(|a, b| a.path.cmp(&b.path));
        let total_missing = self.results.iter().map(|r| r.missing.len()).sum();

        ScanReport {
            root: root.to_path_buf(),
            files_scanned: self.files_scanned,
            files_skipped: self.files_skipped,
            declarations_scanned: self.stats.declarations,
            documented: self.stats.documented,
            total_missing,
            coverage_percent: self.stats.percent(),
            passed: total_missing == 0,
            files: self.results,
        }
    }
}

impl Extend<FileOutcome> for Collector {
    fn extend<T: IntoIterator<Item = FileOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.submit(outcome);
        }
    }
}
