//! Documentation coverage decisions and statistics.

use serde::Serialize;

use crate::analysis::FileFacts;

/// Decide whether a declaration carries a documentation block.
///
/// `docstring` is the evaluated value of the string literal forming the
/// first statement of the declaration body, or `None` when the body does
/// not start with one. The block counts only when it is non-empty after
/// trimming. There are no exemptions by kind or by name.
pub fn is_documented(docstring: Option<&str>) -> bool {
    docstring.map(|d| !d.trim().is_empty()).unwrap_or(false)
}

/// Running totals of declarations and documented declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoverageStats {
    pub declarations: usize,
    pub documented: usize,
}

impl CoverageStats {
    /// Statistics for one file's declarations.
    pub fn from_facts(facts: &FileFacts) -> Self {
        Self {
            declarations: facts.declarations.len(),
            documented: facts.documented_count(),
        }
    }

    /// Number of undocumented declarations.
    pub fn missing(&self) -> usize {
        self.declarations - self.documented
    }

    /// Documented share in percent. A tree without declarations is fully covered.
    pub fn percent(&self) -> f64 {
        if self.declarations == 0 {
            return 100.0;
        }
        self.documented as f64 * 100.0 / self.declarations as f64
    }

    /// Merge another file's statistics into this one.
    pub fn merge(&mut self, other: CoverageStats) {
        self.declarations += other.declarations;
        self.documented += other.documented;
    }
}
