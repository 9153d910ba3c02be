//! Syntax front ends for the two language families.
//!
//! Uses tree-sitter for error-tolerant parsing. Both front ends expose the
//! same contract: a grammar, the extensions they claim, and a full pre-order
//! [`visit`] over the parsed tree, so route registrations are found at any
//! nesting depth.

pub mod javascript;
pub mod typescript;

use crate::errors::{Error, Result};
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

/// Trait for language-specific syntax front ends.
pub trait FrontEnd: Send + Sync {
    /// Get the tree-sitter language.
    fn language(&self) -> Language;

    /// File extensions this front end handles.
    fn extensions(&self) -> &[&str];

    /// Extension appended to extensionless import specifiers during
    /// cross-file handler resolution.
    fn default_extension(&self) -> &'static str;

    /// Parse one file's text into a syntax tree.
    ///
    /// Fails with [`Error::Parse`] when the text does not parse; the caller
    /// is expected to skip the file, not abort the scan.
    fn parse(&self, source: &str, path: &Path) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language())
            .map_err(|_| Error::Parse {
                path: path.to_path_buf(),
            })?;
        let tree = parser.parse(source, None).ok_or_else(|| Error::Parse {
            path: path.to_path_buf(),
        })?;
        if tree.root_node().has_error() {
            return Err(Error::Parse {
                path: path.to_path_buf(),
            });
        }
        Ok(tree)
    }
}

/// Get the front end for a file based on its extension.
pub fn front_end_for(path: &Path) -> Option<Box<dyn FrontEnd>> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "js" | "mjs" | "cjs" => Some(Box::new(javascript::ScriptFrontEnd::new())),
        "ts" | "mts" | "cts" => Some(Box::new(typescript::TypedFrontEnd::new_typescript())),
        "tsx" => Some(Box::new(typescript::TypedFrontEnd::new_tsx())),
        _ => None,
    }
}

/// Pre-order depth-first traversal invoking `f` at every node, comments
/// included.
pub fn visit<'t>(node: Node<'t>, f: &mut dyn FnMut(Node<'t>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, f);
    }
}

// ============================================================================
// Node helpers shared by the recognizer, resolver, and extractor
// ============================================================================

pub(crate) fn text_of(bytes: &[u8], node: Node) -> Option<String> {
    std::str::from_utf8(&bytes[node.start_byte()..node.end_byte()])
        .ok()
        .map(|s| s.to_string())
}

pub(crate) fn strip_quotes(s: &str) -> String {
    s.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// Literal value of a string node, quotes stripped. `None` for anything that
/// is not a plain string literal.
pub(crate) fn string_literal_value(bytes: &[u8], node: Node) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    text_of(bytes, node).map(|s| strip_quotes(&s))
}

/// Whether a node is a function literal (arrow, expression, or declaration).
pub(crate) fn is_function_literal(node: Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function" | "function_expression" | "function_declaration"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn front_end_dispatch_by_extension() {
        assert!(front_end_for(&PathBuf::from("routes/users.js")).is_some());
        assert!(front_end_for(&PathBuf::from("routes/users.mjs")).is_some());
        assert!(front_end_for(&PathBuf::from("app.controller.ts")).is_some());
        assert!(front_end_for(&PathBuf::from("view.tsx")).is_some());
        assert!(front_end_for(&PathBuf::from("README.md")).is_none());
        assert!(front_end_for(&PathBuf::from("Makefile")).is_none());
    }

    #[test]
    fn visit_reaches_nested_nodes() {
        let fe = javascript::ScriptFrontEnd::new();
        let source = "function outer() { app.get('/x', () => {}); }";
        let tree = fe.parse(source, &PathBuf::from("a.js")).unwrap();
        let mut kinds = Vec::new();
        visit(tree.root_node(), &mut |n| kinds.push(n.kind().to_string()));
        assert!(kinds.iter().any(|k| k == "call_expression"));
        assert!(kinds.iter().any(|k| k == "arrow_function"));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        let fe = javascript::ScriptFrontEnd::new();
        let err = fe.parse("const = = {", &PathBuf::from("broken.js"));
        assert!(err.is_err());
    }
}
