//! AST-backed declaration extraction.
//!
//! A source file is parsed with tree-sitter into a syntax tree that lives
//! only as long as its own extraction, then reduced to a flat, ordered list
//! of documentable declarations.
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌──────────────────┐
//! │ Source text │────▶│ Analyzer      │────▶│ FileFacts        │
//! └─────────────┘     │ (Python)      │     │ (Declarations,   │
//!                     └───────────────┘     │  documented flag)│
//!                                           └──────────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement the `LanguageAnalyzer` trait
//! 3. Register the analyzer in `languages/mod.rs`

mod facts;
mod languages;
mod traits;

pub use facts::{Declaration, DeclarationKind, FileFacts, Span};
pub use languages::{get_analyzer, register_analyzers, registered_extensions, PythonAnalyzer};
pub use traits::{LanguageAnalyzer, ParsedFile};
