//! Endpoint normalization: resource naming, version prefixes, grouping.

use crate::types::{EndpointRecord, ResourceGroup};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v\d+$").expect("valid pattern"))
}

/// Grouping key for a route file: its base name without extension.
pub fn resource_name(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Route prefix for a route file.
///
/// `index` files get no prefix. Otherwise the registered path is prefixed
/// with `/<resource>`, or `/<version>/<resource>` when a directory component
/// of the file path matches `v<digits>`. The first matching component of the
/// full path wins, so nested version directories resolve to the outermost
/// one.
pub fn route_prefix(file: &Path) -> String {
    let resource = resource_name(file);
    if resource == "index" {
        return String::new();
    }

    let version = file
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .find(|c| version_pattern().is_match(c));

    match version {
        Some(version) => format!("/{version}/{resource}"),
        None => format!("/{resource}"),
    }
}

/// Cluster records by resource name, preserving discovery order both across
/// groups and within each group.
pub fn group_by_resource(records: Vec<EndpointRecord>) -> Vec<ResourceGroup> {
    let mut groups: Vec<ResourceGroup> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.name == record.resource_name) {
            Some(group) => group.endpoints.push(record),
            None => groups.push(ResourceGroup {
                name: record.resource_name.clone(),
                endpoints: vec![record],
            }),
        }
    }
    groups
}
