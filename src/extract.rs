//! Metadata extraction from recognized route calls and resolved handlers.
//!
//! Everything here is shape inference over static syntax: header pairs from
//! the options object, query parameters from `:name` path segments, body
//! fields from assignments to or destructuring of a `body` member, and a
//! description from the nearest preceding doc comment. Handlers are never
//! executed and unrecognized shapes degrade to empty defaults.

use crate::parsing::{string_literal_value, text_of, visit};
use crate::resolve::HandlerDefinition;
use crate::types::{BodyShape, Header, QueryParam};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::Node;

/// Placeholder used for query-parameter values; the engine does not infer
/// real examples.
const PARAM_PLACEHOLDER: &str = "exampleValue";

fn path_param_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":[A-Za-z0-9_-]+").expect("valid pattern"))
}

/// Header pairs from a route call's options object, in declaration order,
/// followed by the unconditional `Content-Type: application/json` default.
///
/// Only identifier-keyed properties with string-literal values qualify.
pub fn extract_headers(options: Option<Node>, bytes: &[u8]) -> Vec<Header> {
    let mut headers = Vec::new();

    if let Some(object) = options.filter(|n| n.kind() == "object") {
        let mut cursor = object.walk();
        for prop in object.named_children(&mut cursor) {
            if prop.kind() != "pair" {
                continue;
            }
            let key = prop
                .child_by_field_name("key")
                .filter(|k| matches!(k.kind(), "property_identifier" | "identifier"))
                .and_then(|k| text_of(bytes, k));
            let value = prop
                .child_by_field_name("value")
                .and_then(|v| string_literal_value(bytes, v));
            if let (Some(key), Some(value)) = (key, value) {
                headers.push(Header::new(key, value));
            }
        }
    }

    headers.push(Header::new("Content-Type", "application/json"));
    headers
}

/// Query-parameter keys from `:name` segments of a route path, left to
/// right.
pub fn extract_query_params(path: &str) -> Vec<QueryParam> {
    path_param_pattern()
        .find_iter(path)
        .map(|m| QueryParam {
            key: m.as_str()[1..].to_string(),
            value: PARAM_PLACEHOLDER.to_string(),
        })
        .collect()
}

/// Infer the request-body shape from a resolved handler body.
///
/// Two shapes are recognized: a direct assignment `<recv>.body = {...}`
/// (object fields keep literal values, identifiers become placeholders) and
/// destructuring `const { a, b } = <recv>.body` (fields map to `null`). An
/// assignment replaces whatever was accumulated; destructured keys merge in.
pub fn extract_body(handler: Node, bytes: &[u8]) -> BodyShape {
    let mut body = BodyShape::new();

    visit(handler, &mut |node| match node.kind() {
        "assignment_expression" => {
            if let (Some(left), Some(right)) = (
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                if is_body_member(left, bytes) {
                    if let serde_json::Value::Object(map) = literal_value(right, bytes) {
                        body = map;
                    }
                }
            }
        }
        "variable_declarator" => {
            let id = node.child_by_field_name("name");
            let init = node.child_by_field_name("value");
            if let (Some(id), Some(init)) = (id, init) {
                if id.kind() == "object_pattern" && is_body_member(init, bytes) {
                    collect_pattern_keys(id, bytes, &mut body);
                }
            }
        }
        _ => {}
    });

    body
}

/// Whether a node is a member expression ending in `.body`, any receiver.
fn is_body_member(node: Node, bytes: &[u8]) -> bool {
    node.kind() == "member_expression"
        && node
            .child_by_field_name("property")
            .and_then(|p| text_of(bytes, p))
            .as_deref()
            == Some("body")
}

/// Names bound by an object pattern, each mapped to `null`.
fn collect_pattern_keys(pattern: Node, bytes: &[u8], body: &mut BodyShape) {
    let mut cursor = pattern.walk();
    for element in pattern.named_children(&mut cursor) {
        let key = match element.kind() {
            "shorthand_property_identifier_pattern" => text_of(bytes, element),
            "pair_pattern" => element
                .child_by_field_name("key")
                .and_then(|k| text_of(bytes, k)),
            "object_assignment_pattern" => element
                .child_by_field_name("left")
                .and_then(|l| text_of(bytes, l)),
            _ => None,
        };
        if let Some(key) = key {
            body.insert(key, serde_json::Value::Null);
        }
    }
}

/// Static value of an expression node: object literals recurse, string and
/// number literals keep their value, identifiers note the name, anything
/// else is `null`.
fn literal_value(node: Node, bytes: &[u8]) -> serde_json::Value {
    match node.kind() {
        "object" => {
            let mut map = BodyShape::new();
            let mut cursor = node.walk();
            for prop in node.named_children(&mut cursor) {
                match prop.kind() {
                    "pair" => {
                        let key = prop.child_by_field_name("key").and_then(|k| {
                            if k.kind() == "string" {
                                string_literal_value(bytes, k)
                            } else {
                                text_of(bytes, k)
                            }
                        });
                        if let (Some(key), Some(value)) = (key, prop.child_by_field_name("value")) {
                            map.insert(key, literal_value(value, bytes));
                        }
                    }
                    "shorthand_property_identifier" => {
                        if let Some(name) = text_of(bytes, prop) {
                            map.insert(name.clone(), placeholder_for(&name));
                        }
                    }
                    _ => {}
                }
            }
            serde_json::Value::Object(map)
        }
        "string" => string_literal_value(bytes, node)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
        "number" => text_of(bytes, node)
            .and_then(|t| t.parse::<serde_json::Number>().ok())
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        "identifier" => text_of(bytes, node)
            .map(|name| placeholder_for(&name))
            .unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Null,
    }
}

fn placeholder_for(identifier: &str) -> serde_json::Value {
    serde_json::Value::String(format!("value of {identifier}"))
}

/// Description text from the nearest doc comment strictly preceding the
/// handler, parsed as summary plus every tag's trailing description.
pub fn extract_description(definition: &HandlerDefinition) -> Option<String> {
    let comment = definition
        .preceding_comments()
        .into_iter()
        .filter(|(_, text)| text.starts_with("/**"))
        .max_by_key(|(end, _)| *end)
        .map(|(_, text)| text)?;

    let description = parse_doc_comment(&comment);
    if description.is_empty() {
        None
    } else {
        Some(description)
    }
}

/// Parse a `/** ... */` comment: summary lines up to the first tag, then
/// each tag's description text appended with a space.
fn parse_doc_comment(comment: &str) -> String {
    let inner = comment
        .trim_start_matches("/**")
        .trim_end_matches("*/")
        .trim();

    let mut summary: Vec<&str> = Vec::new();
    let mut tag_texts: Vec<String> = Vec::new();
    let mut in_tags = false;

    for line in inner.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if line.starts_with('@') {
            in_tags = true;
            if let Some(text) = tag_description(line) {
                tag_texts.push(text);
            }
        } else if !in_tags && !line.is_empty() {
            summary.push(line);
        }
    }

    let mut description = summary.join(" ");
    for text in tag_texts {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&text);
    }
    description
}

/// Description portion of one `@tag` line: strip the tag, an optional
/// `{type}` annotation, the bound name for name-taking tags, and any
/// leading hyphen separator.
fn tag_description(line: &str) -> Option<String> {
    let (tag, mut rest) = match line.split_once(char::is_whitespace) {
        Some((tag, rest)) => (tag, rest.trim()),
        None => return None,
    };

    if rest.starts_with('{') {
        match rest.find('}') {
            Some(pos) => rest = rest[pos + 1..].trim(),
            None => return None,
        }
    }

    let takes_name = matches!(
        tag,
        "@param" | "@arg" | "@argument" | "@property" | "@prop" | "@typedef"
    );
    if takes_name {
        rest = rest
            .split_once(char::is_whitespace)
            .map(|(_, r)| r.trim())
            .unwrap_or("");
    }

    let rest = rest.trim_start_matches('-').trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
