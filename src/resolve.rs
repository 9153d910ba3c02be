//! Handler resolution.
//!
//! Follows a registered handler reference to its real function body: inline
//! literals directly, local identifiers through the current file's
//! declarations, and imported identifiers across `import`/`require` edges
//! into other files, recursively. Resolution is bounded by a visited set of
//! `(file, identifier)` pairs so circular re-exports terminate instead of
//! looping.
//!
//! Resolution failure is never an error: the endpoint is still emitted with
//! empty metadata.

use crate::parsing::{is_function_literal, string_literal_value, text_of, visit, FrontEnd};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// A reference to a registered handler, before resolution.
#[derive(Debug)]
pub enum HandlerRef<'t> {
    /// Function literal (or decorated method) passed directly at the call
    /// site.
    Inline {
        node: Node<'t>,
        name: Option<String>,
    },
    /// Identifier to be chased through local declarations and imports.
    Ident { name: String },
}

/// A resolved handler: the function node plus the file it lives in.
///
/// Owns its source text and tree so the extractor can inspect the body even
/// when it came from a different file than the registration.
pub struct HandlerDefinition {
    pub file: PathBuf,
    pub source: String,
    tree: Tree,
    start_byte: usize,
    end_byte: usize,
    pub name: Option<String>,
}

impl HandlerDefinition {
    fn from_node(
        file: &Path,
        source: &str,
        tree: &Tree,
        node: Node,
        name: Option<String>,
    ) -> Self {
        Self {
            file: file.to_path_buf(),
            source: source.to_string(),
            tree: tree.clone(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            name,
        }
    }

    /// The resolved function node inside the owned tree.
    pub fn node(&self) -> Node<'_> {
        let root = self.tree.root_node();
        root.descendant_for_byte_range(self.start_byte, self.end_byte)
            .unwrap_or(root)
    }

    /// Comment nodes in the owning file that end before the handler starts,
    /// for doc-comment lookup.
    pub fn preceding_comments(&self) -> Vec<(usize, String)> {
        let bytes = self.source.as_bytes();
        let mut comments = Vec::new();
        visit(self.tree.root_node(), &mut |node| {
            if node.kind() == "comment" && node.end_byte() <= self.start_byte {
                if let Some(text) = text_of(bytes, node) {
                    comments.push((node.end_byte(), text));
                }
            }
        });
        comments
    }
}

/// Resolves handler references for one language front end.
pub struct Resolver<'a> {
    front_end: &'a dyn FrontEnd,
}

impl<'a> Resolver<'a> {
    pub fn new(front_end: &'a dyn FrontEnd) -> Self {
        Self { front_end }
    }

    /// Resolve a handler reference found in `file` (already parsed as
    /// `source`/`tree`). Returns `None` when the handler cannot be located.
    pub fn resolve(
        &self,
        reference: &HandlerRef,
        file: &Path,
        source: &str,
        tree: &Tree,
    ) -> Option<HandlerDefinition> {
        match reference {
            HandlerRef::Inline { node, name } => Some(HandlerDefinition::from_node(
                file,
                source,
                tree,
                *node,
                name.clone(),
            )),
            HandlerRef::Ident { name } => {
                let mut visited = HashSet::new();
                let resolved = self.resolve_ident(name, file, source, tree, &mut visited);
                if resolved.is_none() {
                    tracing::debug!(
                        "handler '{}' referenced in {} could not be resolved",
                        name,
                        file.display()
                    );
                }
                resolved
            }
        }
    }

    fn resolve_ident(
        &self,
        name: &str,
        file: &Path,
        source: &str,
        tree: &Tree,
        visited: &mut HashSet<(PathBuf, String)>,
    ) -> Option<HandlerDefinition> {
        if !visited.insert((file.to_path_buf(), name.to_string())) {
            // Cycle: a (file, identifier) pair repeated in this chain.
            return None;
        }

        let bytes = source.as_bytes();
        if let Some(node) = find_local_binding(tree.root_node(), bytes, name) {
            return Some(HandlerDefinition::from_node(
                file,
                source,
                tree,
                node,
                Some(name.to_string()),
            ));
        }

        let import = find_import_binding(tree.root_node(), bytes, name)?;
        let target_path = resolve_module_path(
            file,
            &import.module,
            self.front_end.default_extension(),
        );
        let imported_source = match fs::read_to_string(&target_path) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(
                    "cannot read imported module {}: {}",
                    target_path.display(),
                    e
                );
                return None;
            }
        };
        let imported_tree = self.front_end.parse(&imported_source, &target_path).ok()?;
        self.resolve_ident(
            &import.target,
            &target_path,
            &imported_source,
            &imported_tree,
            visited,
        )
    }
}

/// An import edge binding `target` (the name to look up in the imported
/// module) out of `module` (the specifier as written).
struct ImportBinding {
    module: String,
    target: String,
}

/// Scan a file for a local binding of `name` to a function.
///
/// Recognized shapes: function declarations, variable declarations
/// initialized with a function or arrow-function literal, CommonJS
/// `module.exports.<name> = fn` / `exports.<name> = fn`, and
/// `module.exports = { <name>: fn }`. Export statements are transparent
/// since the traversal descends into them. The last binding encountered in
/// depth-first order wins.
fn find_local_binding<'t>(root: Node<'t>, bytes: &[u8], name: &str) -> Option<Node<'t>> {
    let mut found = None;
    visit(root, &mut |node| {
        match node.kind() {
            "function_declaration" => {
                if let Some(id) = node.child_by_field_name("name") {
                    if text_of(bytes, id).as_deref() == Some(name) {
                        found = Some(node);
                    }
                }
            }
            "variable_declarator" => {
                let id = node.child_by_field_name("name");
                let init = node.child_by_field_name("value");
                if let (Some(id), Some(init)) = (id, init) {
                    if id.kind() == "identifier"
                        && text_of(bytes, id).as_deref() == Some(name)
                        && is_function_literal(init)
                    {
                        found = Some(init);
                    }
                }
            }
            "assignment_expression" => {
                if let Some(binding) = commonjs_export_binding(node, bytes, name) {
                    found = Some(binding);
                }
            }
            _ => {}
        }
    });
    found
}

/// Match CommonJS export assignments that bind `name` to a function.
fn commonjs_export_binding<'t>(node: Node<'t>, bytes: &[u8], name: &str) -> Option<Node<'t>> {
    let left = node.child_by_field_name("left")?;
    let right = node.child_by_field_name("right")?;
    if left.kind() != "member_expression" {
        return None;
    }
    let object = left.child_by_field_name("object")?;
    let property = text_of(bytes, left.child_by_field_name("property")?)?;

    // module.exports = { name: fn }
    if property == "exports"
        && object.kind() == "identifier"
        && text_of(bytes, object).as_deref() == Some("module")
        && right.kind() == "object"
    {
        let mut cursor = right.walk();
        for prop in right.named_children(&mut cursor) {
            if prop.kind() != "pair" {
                continue;
            }
            let key = prop.child_by_field_name("key")?;
            let value = prop.child_by_field_name("value")?;
            if text_of(bytes, key).as_deref() == Some(name) && is_function_literal(value) {
                return Some(value);
            }
        }
        return None;
    }

    if property != name || !is_function_literal(right) {
        return None;
    }

    // module.exports.name = fn
    if object.kind() == "member_expression" {
        let base = object.child_by_field_name("object")?;
        let base_prop = text_of(bytes, object.child_by_field_name("property")?)?;
        if text_of(bytes, base).as_deref() == Some("module") && base_prop == "exports" {
            return Some(right);
        }
        return None;
    }

    // exports.name = fn
    if object.kind() == "identifier" && text_of(bytes, object).as_deref() == Some("exports") {
        return Some(right);
    }

    None
}

/// Scan a file for an import or require edge that binds `name`.
fn find_import_binding(root: Node, bytes: &[u8], name: &str) -> Option<ImportBinding> {
    let mut found = None;
    visit(root, &mut |node| {
        if found.is_some() {
            return;
        }
        let binding = match node.kind() {
            "import_statement" => esm_import_binding(node, bytes, name),
            "variable_declarator" => require_binding(node, bytes, name),
            "assignment_expression" => reexport_binding(node, bytes, name),
            _ => None,
        };
        if binding.is_some() {
            found = binding;
        }
    });
    found
}

/// `import { name } from 'mod'` / `import { orig as name } from 'mod'`.
fn esm_import_binding(node: Node, bytes: &[u8], name: &str) -> Option<ImportBinding> {
    let source = node.child_by_field_name("source")?;
    let module = string_literal_value(bytes, source)?;

    let mut binding = None;
    visit(node, &mut |n| {
        if n.kind() != "import_specifier" || binding.is_some() {
            return;
        }
        let imported = n.child_by_field_name("name");
        let alias = n.child_by_field_name("alias");
        let local = alias.or(imported);
        if local.and_then(|l| text_of(bytes, l)).as_deref() == Some(name) {
            // Follow the original (pre-alias) name into the target module.
            let target = imported
                .and_then(|i| text_of(bytes, i))
                .unwrap_or_else(|| name.to_string());
            binding = Some(ImportBinding { module: module.clone(), target });
        }
    });
    binding
}

/// `const { name } = require('mod')` / `const name = require('mod')`.
fn require_binding(node: Node, bytes: &[u8], name: &str) -> Option<ImportBinding> {
    let id = node.child_by_field_name("name")?;
    let init = node.child_by_field_name("value")?;
    let module = require_specifier(init, bytes)?;

    match id.kind() {
        "identifier" if text_of(bytes, id).as_deref() == Some(name) => Some(ImportBinding {
            module,
            target: name.to_string(),
        }),
        "object_pattern" => {
            let mut cursor = id.walk();
            for element in id.named_children(&mut cursor) {
                match element.kind() {
                    "shorthand_property_identifier_pattern" => {
                        if text_of(bytes, element).as_deref() == Some(name) {
                            return Some(ImportBinding {
                                module,
                                target: name.to_string(),
                            });
                        }
                    }
                    "pair_pattern" => {
                        let key = element.child_by_field_name("key")?;
                        let value = element.child_by_field_name("value")?;
                        if text_of(bytes, value).as_deref() == Some(name) {
                            // const { orig: name } = require(...)
                            return Some(ImportBinding {
                                module,
                                target: text_of(bytes, key)?,
                            });
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

/// `module.exports = require('mod')` re-export: chase the same name onward.
fn reexport_binding(node: Node, bytes: &[u8], name: &str) -> Option<ImportBinding> {
    let left = node.child_by_field_name("left")?;
    let right = node.child_by_field_name("right")?;
    if left.kind() != "member_expression" {
        return None;
    }
    let object = left.child_by_field_name("object")?;
    let property = text_of(bytes, left.child_by_field_name("property")?)?;
    if object.kind() != "identifier"
        || text_of(bytes, object).as_deref() != Some("module")
        || property != "exports"
    {
        return None;
    }
    require_specifier(right, bytes).map(|module| ImportBinding {
        module,
        target: name.to_string(),
    })
}

/// Module specifier of a `require('...')` call, if the node is one.
fn require_specifier(node: Node, bytes: &[u8]) -> Option<String> {
    if node.kind() != "call_expression" {
        return None;
    }
    let callee = node.child_by_field_name("function")?;
    if callee.kind() != "identifier" || text_of(bytes, callee).as_deref() != Some("require") {
        return None;
    }
    let args = node.child_by_field_name("arguments")?;
    let mut cursor = args.walk();
    let first = args.named_children(&mut cursor).next()?;
    string_literal_value(bytes, first)
}

/// Extensions a specifier may already carry; anything else is part of the
/// basename (Node's `user.controller` convention).
const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "mts", "cts", "tsx"];

/// Resolve a module specifier relative to the importing file, appending the
/// front end's default extension unless the specifier already ends in a
/// source extension. Appending by concatenation keeps dotted basenames
/// intact.
fn resolve_module_path(from: &Path, specifier: &str, default_ext: &str) -> PathBuf {
    let base = from.parent().unwrap_or_else(|| Path::new("."));
    let resolved = base.join(specifier);
    let has_source_ext = resolved
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.contains(&e))
        .unwrap_or(false);
    if has_source_ext {
        return resolved;
    }
    let mut joined = resolved.into_os_string();
    joined.push(".");
    joined.push(default_ext);
    PathBuf::from(joined)
}
