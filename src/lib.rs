//! doccov - documentation coverage gate for Python sources.
//!
//! doccov walks a directory tree, parses every `.py` file with tree-sitter,
//! and reports each function, async function, class and method whose body
//! does not begin with a non-empty docstring.
//!
//! # Architecture
//!
//! - `detect::Walker`: lazy discovery of candidate files under a root
//! - `analysis`: per-file parsing and declaration extraction
//! - `detect::coverage`: the documented / undocumented decision
//! - `detect::Collector`: deterministic merge of per-file results
//! - `report`: output formatting (text, JSON)
//!
//! Files are analyzed in parallel with rayon; only the collector sees
//! results from more than one file.

pub mod analysis;
pub mod cli;
pub mod detect;
pub mod error;
pub mod report;

pub use analysis::{Declaration, DeclarationKind, FileFacts, LanguageAnalyzer, PythonAnalyzer};
pub use detect::{FileResult, Runner, ScanOptions, ScanReport, Walker};
pub use error::ScanError;
