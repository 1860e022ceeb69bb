//! Fact structures extracted from AST analysis.

use std::fmt;

use serde::Serialize;

/// Source location of a declaration header (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Span {
    /// Start line (1-indexed).
    pub line: usize,
    /// Start column (1-indexed).
    pub column: usize,
}

impl Span {
    /// Create a span from the start of a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            line: start.row + 1, // tree-sitter is 0-indexed
            column: start.column + 1,
        }
    }
}

/// Kind of documentable declaration.
///
/// The set is closed: every declaration the extractor yields is exactly one
/// of these, and every kind is checked by the same documentation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Function,
    AsyncFunction,
    Class,
    Method,
}

impl DeclarationKind {
    /// Convert to the label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "Function",
            DeclarationKind::AsyncFunction => "AsyncFunction",
            DeclarationKind::Class => "Class",
            DeclarationKind::Method => "Method",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A documentable declaration extracted from source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// The kind of declaration.
    pub kind: DeclarationKind,
    /// The bare declaration name.
    pub name: String,
    /// `Class.method` for methods, otherwise the bare name.
    pub qualified_name: String,
    /// Line number (1-indexed) of the `def`/`class` keyword.
    pub line: usize,
    /// Column (1-indexed) of the `def`/`class` keyword.
    pub column: usize,
    /// Evaluated text of the leading string literal, if the body has one.
    #[serde(skip)]
    pub docstring: Option<String>,
    /// Whether the declaration carries a documentation block.
    #[serde(skip)]
    pub documented: bool,
}

/// Everything extracted from a single source file.
#[derive(Debug, Clone)]
pub struct FileFacts {
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl FileFacts {
    /// Declarations lacking a documentation block, in source order.
    pub fn missing(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| !d.documented)
    }

    /// Number of documented declarations.
    pub fn documented_count(&self) -> usize {
        self.declarations.iter().filter(|d| d.documented).count()
    }
}
