//! Documentation coverage detection over a directory tree.

mod aggregate;
pub mod coverage;
mod runner;
mod types;
mod walker;

pub use aggregate::Collector;
pub use coverage::{is_documented, CoverageStats};
pub use runner::{analyze_file, Runner, ScanOptions};
pub use types::{FileOutcome, FileResult, ScanReport};
pub use walker::Walker;
