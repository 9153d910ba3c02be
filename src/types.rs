//! Core types for the endpoint model.
//!
//! Every discovered route normalizes into an [`EndpointRecord`], the
//! framework-agnostic shape handed to the collection emitter. Records are
//! clustered into [`ResourceGroup`]s keyed by the route file they came from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// HTTP methods recognized as route registrations.
///
/// Any other verb on the receiver object is not a route and produces no
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

impl HttpMethod {
    /// Parse a lowercase member-call verb (`get`, `post`, ...).
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Parse a capitalized decorator name (`Get`, `Post`, ...).
    pub fn from_decorator(name: &str) -> Option<Self> {
        match name {
            "Get" => Some(Self::Get),
            "Post" => Some(Self::Post),
            "Put" => Some(Self::Put),
            "Delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A header key/value pair extracted from a route's options object.
///
/// Duplicate keys are legal and preserved in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A query parameter derived from a `:name` segment in the route path.
///
/// Values are non-functional placeholders, not real examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

/// Inferred request-body shape: field name to placeholder value.
///
/// This is shape inference over static syntax, never an evaluation of the
/// handler. Nested object literals nest; unresolvable expressions map to
/// `null`.
pub type BodyShape = serde_json::Map<String, serde_json::Value>;

/// One discovered route, normalized across frameworks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub method: HttpMethod,
    /// Versioned, resource-prefixed route string.
    pub path: String,
    pub headers: Vec<Header>,
    #[serde(rename = "queryParameters")]
    pub query_parameters: Vec<QueryParam>,
    pub body: BodyShape,
    /// Text of the nearest preceding doc comment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// File the registration call was found in.
    #[serde(rename = "sourceFile")]
    pub source_file: PathBuf,
    /// Grouping key derived from the route file's base name.
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    /// Name of the resolved handler, when it had one.
    #[serde(rename = "handlerName", skip_serializing_if = "Option::is_none")]
    pub handler_name: Option<String>,
}

/// Endpoints clustered by resource, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceGroup {
    pub name: String,
    pub endpoints: Vec<EndpointRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_map_to_methods() {
        assert_eq!(HttpMethod::from_verb("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_verb("delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::from_verb("patch"), None);
        assert_eq!(HttpMethod::from_verb("Get"), None);
    }

    #[test]
    fn decorators_are_capitalized() {
        assert_eq!(HttpMethod::from_decorator("Post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::from_decorator("post"), None);
    }

    #[test]
    fn methods_serialize_uppercase() {
        let json = serde_json::to_string(&HttpMethod::Put).unwrap();
        assert_eq!(json, "\"PUT\"");
    }
}
