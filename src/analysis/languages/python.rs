//! Python language analyzer using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node, Parser};

use crate::analysis::{Declaration, DeclarationKind, LanguageAnalyzer, ParsedFile, Span};
use crate::detect::coverage;
use crate::error::ScanError;

/// UTF-8 byte-order mark, tolerated at the start of a file.
const BOM: char = '\u{feff}';

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, tree_sitter::LanguageError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Build a declaration for a `function_definition` or `class_definition`.
    ///
    /// `class_scope` is the name of the class whose body directly contains
    /// the node, and is only used to qualify methods.
    fn declaration(
        &self,
        parsed: &ParsedFile,
        node: Node,
        kind: DeclarationKind,
        class_scope: Option<&str>,
    ) -> Option<Declaration> {
        let name = parsed
            .node_text(node.child_by_field_name("name")?)
            .to_string();
        if name.is_empty() {
            return None;
        }

        let qualified_name = match (kind, class_scope) {
            (DeclarationKind::Method, Some(class)) => format!("{}.{}", class, name),
            _ => name.clone(),
        };

        let docstring = self.docstring(parsed, node);
        let span = Span::from_node(node);

        Some(Declaration {
            kind,
            name,
            qualified_name,
            line: span.line,
            column: span.column,
            documented: coverage::is_documented(docstring.as_deref()),
            docstring,
        })
    }

    /// Value of the string literal forming the first statement of the body.
    fn docstring(&self, parsed: &ParsedFile, definition: Node) -> Option<String> {
        let body = definition.child_by_field_name("body")?;
        let mut cursor = body.walk();
        let first = body
            .named_children(&mut cursor)
            .find(|n| n.kind() != "comment")?;

        // `"a", "b"` is a tuple, not a docstring.
        if first.kind() != "expression_statement" || first.named_child_count() != 1 {
            return None;
        }

        string_value(parsed, first.named_child(0)?)
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<ParsedFile, ScanError> {
        let parse_error = || ScanError::Parse {
            path: path.to_path_buf(),
        };

        let source = source.strip_prefix(BOM).unwrap_or(source);
        let mut parser = self.create_parser().map_err(|e| {
            tracing::debug!(error = %e, "python grammar rejected by tree-sitter");
            parse_error()
        })?;
        let tree = parser.parse(source, None).ok_or_else(parse_error)?;

        // Error recovery still yields a tree; any ERROR or MISSING node means
        // the file would not compile.
        if tree.root_node().has_error() {
            return Err(parse_error());
        }

        // The grammar also accepts Python 2 forms and indentation the
        // interpreter rejects.
        if let Some(node) = first_rejected_node(source, tree.root_node()) {
            tracing::debug!(
                path = %path.display(),
                line = node.start_position().row + 1,
                kind = node.kind(),
                "python 3 rejects this construct"
            );
            return Err(parse_error());
        }

        Ok(ParsedFile {
            tree,
            source: source.to_string(),
        })
    }

    /// Depth-first walk with an explicit stack.
    ///
    /// Each stack entry carries the class whose body *directly* contains the
    /// node. Function definitions with a class scope become methods; every
    /// other function definition, at any depth, is a function. A node is
    /// classified exactly once, when it is popped.
    fn extract_declarations(&self, parsed: &ParsedFile) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        let mut stack: Vec<(Node, Option<&str>)> = vec![(parsed.tree.root_node(), None)];

        while let Some((node, class_scope)) = stack.pop() {
            match node.kind() {
                "decorated_definition" => {
                    // Decorators do not change what the definition is.
                    if let Some(definition) = node.child_by_field_name("definition") {
                        stack.push((definition, class_scope));
                    }
                }
                "function_definition" => {
                    let kind = if class_scope.is_some() {
                        DeclarationKind::Method
                    } else if is_async(node) {
                        DeclarationKind::AsyncFunction
                    } else {
                        DeclarationKind::Function
                    };
                    declarations.extend(self.declaration(parsed, node, kind, class_scope));
                    if let Some(body) = node.child_by_field_name("body") {
                        push_children(&mut stack, body, None);
                    }
                }
                "class_definition" => {
                    declarations.extend(self.declaration(
                        parsed,
                        node,
                        DeclarationKind::Class,
                        None,
                    ));
                    let class_name = node
                        .child_by_field_name("name")
                        .map(|n| parsed.node_text(n));
                    if let Some(body) = node.child_by_field_name("body") {
                        push_children(&mut stack, body, class_name);
                    }
                }
                _ => push_children(&mut stack, node, None),
            }
        }

        declarations
    }
}

/// First node that parses under tree-sitter-python but is not valid Python 3.
fn first_rejected_node<'t>(source: &str, root: Node<'t>) -> Option<Node<'t>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if is_python2_only(node) || has_inconsistent_indent(source, node) {
            return Some(node);
        }
        let mut cursor = node.walk();
        stack.extend(node.named_children(&mut cursor));
    }
    None
}

fn is_python2_only(node: Node) -> bool {
    match node.kind() {
        "print_statement" | "exec_statement" => true,
        // a <> b
        "comparison_operator" => has_token(node, "<>"),
        // except E, e:
        "except_clause" => has_token(node, ","),
        // raise E, "message"
        "raise_statement" => node
            .named_child(0)
            .map(|n| n.kind() == "expression_list")
            .unwrap_or(false),
        _ => false,
    }
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}

/// Statements opening a line in one suite must share a column, and
/// module-level statements start at column 0.
fn has_inconsistent_indent(source: &str, node: Node) -> bool {
    let mut indent = match node.kind() {
        "module" => Some(0),
        "block" => None,
        _ => return false,
    };

    let mut cursor = node.walk();
    for statement in node.named_children(&mut cursor) {
        if statement.is_extra() || !starts_line(source, statement) {
            continue;
        }
        let column = statement.start_position().column;
        match indent {
            Some(expected) if expected != column => return true,
            Some(_) => {}
            None => indent = Some(column),
        }
    }
    false
}

/// Whether only whitespace precedes the node on its first line.
fn starts_line(source: &str, node: Node) -> bool {
    let start = node.start_byte();
    start
        .checked_sub(node.start_position().column)
        .and_then(|line_start| source.get(line_start..start))
        .map(|prefix| prefix.trim().is_empty())
        .unwrap_or(false)
}

/// Push named children in reverse so they pop in source order.
fn push_children<'t, 's>(
    stack: &mut Vec<(Node<'t>, Option<&'s str>)>,
    node: Node<'t>,
    class_scope: Option<&'s str>,
) {
    let mut cursor = node.walk();
    let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
    stack.extend(children.into_iter().rev().map(|child| (child, class_scope)));
}

fn is_async(function: Node) -> bool {
    function
        .child(0)
        .map(|first| first.kind() == "async")
        .unwrap_or(false)
}

/// Evaluate an expression node as a `str` constant.
///
/// Returns `None` for anything that is not a plain string: bytes,
/// f-strings, names, calls, tuples.
fn string_value(parsed: &ParsedFile, expr: Node) -> Option<String> {
    match expr.kind() {
        "string" => evaluate_literal(parsed.node_text(expr)),
        "concatenated_string" => {
            let mut cursor = expr.walk();
            let parts: Option<Vec<String>> = expr
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .map(|part| string_value(parsed, part))
                .collect();
            parts.map(|p| p.concat())
        }
        "parenthesized_expression" if expr.named_child_count() == 1 => {
            string_value(parsed, expr.named_child(0)?)
        }
        _ => None,
    }
}

/// Evaluate the source text of a single string literal.
fn evaluate_literal(text: &str) -> Option<String> {
    let quote_start = text.find(['"', '\''])?;
    let prefix = text[..quote_start].to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let quoted = &text[quote_start..];
    let delimiter = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
        &quoted[..3]
    } else {
        &quoted[..1]
    };
    let inner = quoted.strip_prefix(delimiter)?.strip_suffix(delimiter)?;

    if prefix.contains('r') {
        Some(inner.to_string())
    } else {
        Some(unescape(inner))
    }
}

/// Resolve backslash escapes the way a non-raw `str` literal does.
/// Unknown escapes are kept verbatim.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            None => out.push('\\'),
            // Line continuation
            Some('\n') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some(q @ ('\\' | '\'' | '"')) => out.push(q),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let width = match kind {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.by_ref().take(width).collect();
                match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if digits.len() == width => out.push(decoded),
                    _ => {
                        out.push('\\');
                        out.push(kind);
                        out.push_str(&digits);
                    }
                }
            }
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|n| n.to_digit(8)) {
                        Some(next) => {
                            value = value * 8 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.extend(char::from_u32(value));
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<Declaration> {
        let analyzer = PythonAnalyzer::new();
        let parsed = analyzer.parse(Path::new("test.py"), source).unwrap();
        analyzer.extract_declarations(&parsed)
    }

    fn summary(decls: &[Declaration]) -> Vec<(DeclarationKind, &str, usize, bool)> {
        decls
            .iter()
            .map(|d| (d.kind, d.qualified_name.as_str(), d.line, d.documented))
            .collect()
    }

    #[test]
    fn test_classification_and_order() {
        let source = r#"def top():
    """Top-level doc."""
    def inner():
        pass
    return inner

async def fetch():
    pass

class Widget:
    """A widget."""

    def __init__(self):
        pass

    async def load(self):
        """Load it."""

    class Meta:
        pass
"#;
        let decls = extract(source);
        assert_eq!(
            summary(&decls),
            vec![
                (DeclarationKind::Function, "top", 1, true),
                (DeclarationKind::Function, "inner", 3, false),
                (DeclarationKind::AsyncFunction, "fetch", 7, false),
                (DeclarationKind::Class, "Widget", 10, true),
                (DeclarationKind::Method, "Widget.__init__", 13, false),
                (DeclarationKind::Method, "Widget.load", 16, true),
                (DeclarationKind::Class, "Meta", 19, false),
            ]
        );
    }

    #[test]
    fn test_methods_are_not_double_counted() {
        let source = r#"class Service:
    """Service."""

    def documented(self):
        """Does things."""

    def undocumented(self):
        return 1
"#;
        let decls = extract(source);
        assert_eq!(decls.len(), 3);
        assert_eq!(
            decls
                .iter()
                .filter(|d| d.kind == DeclarationKind::Function)
                .count(),
            0
        );

        let missing: Vec<_> = decls.iter().filter(|d| !d.documented).collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].kind, DeclarationKind::Method);
        assert_eq!(missing[0].qualified_name, "Service.undocumented");
        assert_eq!(missing[0].name, "undocumented");
    }

    #[test]
    fn test_nested_scopes() {
        let source = r#"class Outer:
    def method(self):
        def helper():
            pass
        class Local:
            def run(self):
                pass
        return helper

    if True:
        def conditional(self):
            pass
"#;
        let decls = extract(source);
        assert_eq!(
            summary(&decls),
            vec![
                (DeclarationKind::Class, "Outer", 1, false),
                (DeclarationKind::Method, "Outer.method", 2, false),
                (DeclarationKind::Function, "helper", 3, false),
                (DeclarationKind::Class, "Local", 5, false),
                (DeclarationKind::Method, "Local.run", 6, false),
                // Not an immediate member of the class body
                (DeclarationKind::Function, "conditional", 11, false),
            ]
        );
    }

    #[test]
    fn test_decorated_definitions() {
        let source = r#"@decorator
def wrapped():
    """Wrapped."""

@dataclass
class Point:
    x: int

    @property
    def norm(self):
        return 0

    @staticmethod
    async def make():
        pass
"#;
        let decls = extract(source);
        assert_eq!(
            summary(&decls),
            vec![
                (DeclarationKind::Function, "wrapped", 2, true),
                (DeclarationKind::Class, "Point", 6, false),
                (DeclarationKind::Method, "Point.norm", 10, false),
                (DeclarationKind::Method, "Point.make", 14, false),
            ]
        );
    }

    #[test]
    fn test_empty_docstring_is_missing() {
        let source = r#"def empty():
    ""

def blank():
    """

    """

def escaped():
    "\n\t"

def spaced():
    '''  real text  '''
"#;
        let decls = extract(source);
        let documented: Vec<_> = decls.iter().map(|d| (d.name.as_str(), d.documented)).collect();
        assert_eq!(
            documented,
            vec![
                ("empty", false),
                ("blank", false),
                ("escaped", false),
                ("spaced", true),
            ]
        );
    }

    #[test]
    fn test_docstring_literal_kinds() {
        let source = r#"def raw():
    r"""Raw \d docs."""

def unicode():
    u"Unicode docs."

def concatenated():
    "Part one " "part two."

def parenthesized():
    ("Wrapped docs.")

def bytes_literal():
    b"not a docstring"

def formatted():
    f"not a docstring {1}"

def tuple_literal():
    "a", "b"

def not_first():
    x = 1
    """Too late."""

def after_comment():
    # leading comment
    """Comment does not count as a statement."""
"#;
        let decls = extract(source);
        let documented: Vec<_> = decls.iter().map(|d| (d.name.as_str(), d.documented)).collect();
        assert_eq!(
            documented,
            vec![
                ("raw", true),
                ("unicode", true),
                ("concatenated", true),
                ("parenthesized", true),
                ("bytes_literal", false),
                ("formatted", false),
                ("tuple_literal", false),
                ("not_first", false),
                ("after_comment", true),
            ]
        );

        let concatenated = decls.iter().find(|d| d.name == "concatenated").unwrap();
        assert_eq!(
            concatenated.docstring.as_deref(),
            Some("Part one part two.")
        );
        let raw = decls.iter().find(|d| d.name == "raw").unwrap();
        assert_eq!(raw.docstring.as_deref(), Some(r"Raw \d docs."));
    }

    #[test]
    fn test_one_line_bodies() {
        let source = "def a(): \"Doc.\"\nclass B: pass\n";
        let decls = extract(source);
        assert_eq!(
            summary(&decls),
            vec![
                (DeclarationKind::Function, "a", 1, true),
                (DeclarationKind::Class, "B", 2, false),
            ]
        );
    }

    #[test]
    fn test_syntax_error_is_rejected() {
        let analyzer = PythonAnalyzer::new();
        let result = analyzer.parse(Path::new("broken.py"), "def broken(:\n    return\n");
        assert!(matches!(result, Err(ScanError::Parse { .. })));
    }

    fn rejects(source: &str) -> bool {
        let analyzer = PythonAnalyzer::new();
        matches!(
            analyzer.parse(Path::new("legacy.py"), source),
            Err(ScanError::Parse { .. })
        )
    }

    #[test]
    fn test_python2_syntax_is_rejected() {
        assert!(rejects("def f():\n    print \"hi\"\n"));
        assert!(rejects("print >>sys.stderr, \"hi\"\n"));
        assert!(rejects("exec \"x = 1\"\n"));
        assert!(rejects("x = `1`\n"));
        assert!(rejects("if a <> b:\n    pass\n"));
        assert!(rejects("try:\n    pass\nexcept ValueError, e:\n    pass\n"));
        assert!(rejects("raise ValueError, \"bad\"\n"));
    }

    #[test]
    fn test_python3_forms_are_accepted() {
        assert!(!rejects("print(\"hi\")\nexec(\"x = 1\")\n"));
        assert!(!rejects("try:\n    pass\nexcept (ValueError, TypeError) as e:\n    raise ValueError(\"bad\") from e\n"));
        assert!(!rejects("if a != b:\n    pass\n"));
    }

    #[test]
    fn test_unmatched_dedent_is_rejected() {
        assert!(rejects("def g():\n        x = 1\n    y = 2\n"));
        assert!(rejects(
            "class A:\n    def f(self):\n            a = 1\n        b = 2\n"
        ));
        assert!(rejects("    x = 1\n"));
    }

    #[test]
    fn test_indentation_edge_cases_are_accepted() {
        let source = r#"import os; import sys
x = (1,
     2); y = 3
total = 1 + \
    2

def f():
    a = 1; b = 2
        # comments may sit at any column
    if a:
        return b
    return a
"#;
        assert!(!rejects(source));
        assert_eq!(extract(source).len(), 1);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let decls = extract("\u{feff}def f():\n    \"\"\"Doc.\"\"\"\n");
        assert_eq!(decls.len(), 1);
        assert!(decls[0].documented);
        assert_eq!(decls[0].line, 1);
    }

    #[test]
    fn test_empty_file() {
        assert!(extract("").is_empty());
        assert!(extract("# just a comment\nx = 1\n").is_empty());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"\x41B\U00000043"), "ABC");
        assert_eq!(unescape(r"\101"), "A");
        assert_eq!(unescape(r"\d\q"), r"\d\q");
        assert_eq!(unescape("line\\\ncontinued"), "linecontinued");
        assert_eq!(unescape(r"\xZZ"), r"\xZZ");
    }

    #[test]
    fn test_evaluate_literal() {
        assert_eq!(evaluate_literal(r#""""""""#).as_deref(), Some(""));
        assert_eq!(evaluate_literal("''").as_deref(), Some(""));
        assert_eq!(evaluate_literal(r#"R'\n'"#).as_deref(), Some(r"\n"));
        assert_eq!(evaluate_literal(r#"rb"x""#), None);
        assert_eq!(evaluate_literal(r#"Fr"x""#), None);
    }
}
