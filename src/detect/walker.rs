//! Discovery of candidate source files under a scan root.

use std::path::{Path, PathBuf};

use phf::phf_set;
use walkdir::{DirEntry, WalkDir};

use crate::analysis::registered_extensions;
use crate::error::ScanError;

/// Interpreter/build cache directories that are never descended into.
static CACHE_DIRS: phf::Set<&'static str> = phf_set! {
    "__pycache__",
};

/// Lazily enumerates candidate files below a validated root directory.
///
/// Symbolic links are never followed: linked directories are not traversed
/// and linked files are not candidates, so the walk cannot cycle.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    extensions: Vec<&'static str>,
    excluded_dirs: Vec<String>,
}

impl Walker {
    /// Resolve `root` to an absolute directory path.
    ///
    /// Fails with [`ScanError::RootNotFound`] if the path does not exist or
    /// is not a directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, ScanError> {
        let root = root.as_ref();
        let not_found = || ScanError::RootNotFound {
            path: root.to_path_buf(),
        };

        let abs_root = root.canonicalize().map_err(|_| not_found())?;
        if !abs_root.is_dir() {
            return Err(not_found());
        }

        Ok(Self {
            root: abs_root,
            extensions: registered_extensions(),
            excluded_dirs: Vec::new(),
        })
    }

    /// Treat additional directory names like cache directories.
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// The absolute scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a directory with this name is pruned from the walk.
    pub fn is_skipped_dir(&self, name: &str) -> bool {
        name.starts_with('.')
            || CACHE_DIRS.contains(name)
            || self.excluded_dirs.iter().any(|d| d == name)
    }

    /// Whether a file path has a supported source extension.
    pub fn is_candidate(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Candidate files in discovery order (depth-first, names sorted).
    ///
    /// Directories are pruned before they are read, so a hidden or cache
    /// segment anywhere below the root excludes everything beneath it.
    /// Entries that cannot be read are skipped.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + Send + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !self.prunes(e))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(move |entry| entry.file_type().is_file() && self.is_candidate(entry.path()))
            .map(DirEntry::into_path)
    }

    fn prunes(&self, entry: &DirEntry) -> bool {
        // The root itself is never filtered, even if it is `.` or hidden.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        self.is_skipped_dir(&entry.file_name().to_string_lossy())
    }
}
