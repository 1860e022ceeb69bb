//! Core traits for language analysis.

use std::path::Path;

use super::{Declaration, FileFacts};
use crate::error::ScanError;

/// Holds a parsed tree-sitter tree and the source it was built from.
///
/// A `ParsedFile` lives only for the duration of one file's extraction;
/// nothing retains the tree once declarations have been produced.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Language-specific analyzer trait.
///
/// # Thread Safety
///
/// `tree_sitter::Parser` is not `Sync`, so implementations create a parser
/// per call. Analyzers themselves hold no mutable state and are shared
/// across worker threads.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse source text into a syntax tree.
    ///
    /// Fails with [`ScanError::Parse`] when the source contains syntax errors;
    /// a tree with error-recovery nodes is never handed to extraction.
    fn parse(&self, path: &Path, source: &str) -> Result<ParsedFile, ScanError>;

    /// Enumerate documentable declarations in source order, each already
    /// evaluated by the coverage checker.
    fn extract_declarations(&self, parsed: &ParsedFile) -> Vec<Declaration>;

    /// Parse and extract in one step.
    fn extract_facts(&self, path: &Path, source: &str) -> Result<FileFacts, ScanError> {
        let parsed = self.parse(path, source)?;
        let declarations = self.extract_declarations(&parsed);
        Ok(FileFacts { declarations })
    }
}
