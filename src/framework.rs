//! Framework recognizer.
//!
//! Decides whether a syntax node is a route registration for the configured
//! framework and, if so, pulls the pieces apart: HTTP method, path literal,
//! options object, and the handler references. Most nodes are expected NOT
//! to match; non-matches return `None` without error.

use crate::parsing::{string_literal_value, text_of};
use crate::resolve::HandlerRef;
use crate::types::HttpMethod;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// The supported route-registration pattern families.
///
/// A closed enumeration: each variant carries its own verb set and call
/// shape, selected once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Member calls `app.get/post/put/delete(...)`.
    Express,
    /// Express's verb set plus `fastify.route({...})`.
    Fastify,
    /// `@Get/@Post/@Put/@Delete` method decorators.
    Nest,
}

impl std::str::FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "express" => Ok(Self::Express),
            "fastify" => Ok(Self::Fastify),
            "nest" => Ok(Self::Nest),
            other => Err(format!(
                "unknown framework '{other}' (expected express, fastify, or nest)"
            )),
        }
    }
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Express => "express",
            Self::Fastify => "fastify",
            Self::Nest => "nest",
        }
    }

    /// Member-call verbs this framework registers routes with.
    fn member_verbs(&self) -> &'static [&'static str] {
        match self {
            Self::Express => &["get", "post", "put", "delete"],
            Self::Fastify => &["get", "post", "put", "delete", "route"],
            Self::Nest => &[],
        }
    }

    fn recognizes_decorators(&self) -> bool {
        matches!(self, Self::Nest)
    }

    /// Check a node against this framework's route-registration shape.
    ///
    /// `receiver` is the configured route-registration object name (the
    /// conventional `app`/`router` variable); decorator matching ignores it.
    pub fn match_route_call<'t>(
        &self,
        node: Node<'t>,
        receiver: &str,
        bytes: &[u8],
    ) -> Option<RouteCall<'t>> {
        if self.recognizes_decorators() {
            self.match_decorator(node, bytes)
        } else {
            self.match_member_call(node, receiver, bytes)
        }
    }

    fn match_member_call<'t>(
        &self,
        node: Node<'t>,
        receiver: &str,
        bytes: &[u8],
    ) -> Option<RouteCall<'t>> {
        if node.kind() != "call_expression" {
            return None;
        }
        let callee = node.child_by_field_name("function")?;
        if callee.kind() != "member_expression" {
            return None;
        }
        let object = callee.child_by_field_name("object")?;
        if object.kind() != "identifier" || text_of(bytes, object)? != receiver {
            return None;
        }
        let verb = text_of(bytes, callee.child_by_field_name("property")?)?;
        if !self.member_verbs().contains(&verb.as_str()) {
            return None;
        }

        let args = node.child_by_field_name("arguments")?;
        let (mut path, mut options, mut handlers) = classify_arguments(args, bytes);

        // `.route({...})` carries its verb, url, and handler inside a route
        // config object; anything but the four supported verbs there is not
        // a route. The config object is consumed here so its entries are
        // never mistaken for header pairs downstream.
        let method = if verb == "route" {
            let config = options.take()?;
            let value = object_string_property(config, "method", bytes)?;
            if path.is_empty() {
                if let Some(url) = object_string_property(config, "url", bytes) {
                    path = url;
                }
            }
            if let Some(handler) = object_handler_property(config, bytes) {
                handlers.push(handler);
            }
            HttpMethod::from_verb(&value.to_lowercase())?
        } else {
            HttpMethod::from_verb(&verb)?
        };

        Some(RouteCall {
            method,
            path,
            options,
            handlers,
        })
    }

    fn match_decorator<'t>(&self, node: Node<'t>, bytes: &[u8]) -> Option<RouteCall<'t>> {
        if node.kind() != "decorator" {
            return None;
        }
        let mut call = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "call_expression" {
                call = Some(child);
                break;
            }
        }
        let call = call?;
        let callee = call.child_by_field_name("function")?;
        if callee.kind() != "identifier" {
            return None;
        }
        // Case carries meaning here: decorator names are capitalized.
        let method = HttpMethod::from_decorator(&text_of(bytes, callee)?)?;

        let args = call.child_by_field_name("arguments")?;
        let (path, options, _) = classify_arguments(args, bytes);

        // The handler is the decorated method itself.
        let handlers = decorated_method(node)
            .map(|method_node| {
                let name = method_node
                    .child_by_field_name("name")
                    .and_then(|n| text_of(bytes, n));
                vec![HandlerRef::Inline {
                    node: method_node,
                    name,
                }]
            })
            .unwrap_or_default();

        Some(RouteCall {
            method,
            path,
            options,
            handlers,
        })
    }
}

/// A recognized route-registration call site, pulled apart into the pieces
/// the extractor needs.
#[derive(Debug)]
pub struct RouteCall<'t> {
    pub method: HttpMethod,
    /// Route path literal; empty when the path argument is missing or not a
    /// plain string literal.
    pub path: String,
    /// Options object literal argument, when present.
    pub options: Option<Node<'t>>,
    /// Handler references in argument order (middleware included).
    pub handlers: Vec<HandlerRef<'t>>,
}

/// Sort a call's arguments into path literal, options object, and handler
/// candidates. The first string literal is the path, the first object
/// literal is the options object; function literals and identifiers are
/// handler candidates in order.
fn classify_arguments<'t>(
    args: Node<'t>,
    bytes: &[u8],
) -> (String, Option<Node<'t>>, Vec<HandlerRef<'t>>) {
    let mut path = String::new();
    let mut saw_path = false;
    let mut options = None;
    let mut handlers = Vec::new();

    let mut cursor = args.walk();
    for arg in args.named_children(&mut cursor) {
        match arg.kind() {
            "string" if !saw_path => {
                path = string_literal_value(bytes, arg).unwrap_or_default();
                saw_path = true;
            }
            "object" if options.is_none() => options = Some(arg),
            "arrow_function" | "function" | "function_expression" => {
                handlers.push(HandlerRef::Inline {
                    node: arg,
                    name: None,
                });
            }
            "identifier" => {
                if let Some(name) = text_of(bytes, arg) {
                    handlers.push(HandlerRef::Ident { name });
                }
            }
            _ => {}
        }
    }

    (path, options, handlers)
}

/// String value of a named property in an object literal.
fn object_string_property(object: Node, key: &str, bytes: &[u8]) -> Option<String> {
    let mut cursor = object.walk();
    for prop in object.named_children(&mut cursor) {
        if prop.kind() != "pair" {
            continue;
        }
        let key_node = prop.child_by_field_name("key")?;
        let key_text = match key_node.kind() {
            "property_identifier" | "identifier" => text_of(bytes, key_node)?,
            "string" => string_literal_value(bytes, key_node)?,
            _ => continue,
        };
        if key_text == key {
            return string_literal_value(bytes, prop.child_by_field_name("value")?);
        }
    }
    None
}

/// Handler reference from an options object's `handler` property, either an
/// inline function literal or an identifier.
fn object_handler_property<'t>(object: Node<'t>, bytes: &[u8]) -> Option<HandlerRef<'t>> {
    let mut cursor = object.walk();
    for prop in object.named_children(&mut cursor) {
        if prop.kind() != "pair" {
            continue;
        }
        let key = prop.child_by_field_name("key")?;
        if text_of(bytes, key).as_deref() != Some("handler") {
            continue;
        }
        let value = prop.child_by_field_name("value")?;
        if crate::parsing::is_function_literal(value) {
            return Some(HandlerRef::Inline { node: value, name: None });
        }
        if value.kind() == "identifier" {
            return Some(HandlerRef::Ident {
                name: text_of(bytes, value)?,
            });
        }
        return None;
    }
    None
}

/// The method a decorator is attached to. Decorators appear as children of
/// the `method_definition` in both grammars; older grammar revisions emit
/// them as preceding siblings, so both attachments are handled.
fn decorated_method(decorator: Node) -> Option<Node> {
    if let Some(parent) = decorator.parent() {
        if parent.kind() == "method_definition" {
            return Some(parent);
        }
    }
    let mut sibling = decorator.next_named_sibling();
    while let Some(node) = sibling {
        match node.kind() {
            "decorator" => sibling = node.next_named_sibling(),
            "method_definition" => return Some(node),
            _ => return None,
        }
    }
    None
}
