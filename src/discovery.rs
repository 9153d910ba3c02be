//! Endpoint discovery.
//!
//! Walks a source tree while respecting .gitignore rules, hands each
//! supported file to its syntax front end, and turns every recognized route
//! registration into an [`EndpointRecord`]. A file that fails to read or
//! parse is skipped with a warning; the scan itself never aborts for
//! per-file problems.

use crate::errors::Result;
use crate::extract;
use crate::framework::Framework;
use crate::normalize;
use crate::parsing::{self, FrontEnd};
use crate::resolve::Resolver;
use crate::types::EndpointRecord;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::Path;

/// Discovers route registrations in a repository.
pub struct EndpointDiscovery {
    framework: Framework,
    /// Route-registration object name in source (conventionally `app`).
    receiver: String,
    /// Additional ignore patterns
    exclude_patterns: Vec<String>,
    /// Whether to apply default excludes
    default_excludes: bool,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl EndpointDiscovery {
    pub fn new(framework: Framework, receiver: impl Into<String>) -> Self {
        Self {
            framework,
            receiver: receiver.into(),
            exclude_patterns: Vec::new(),
            default_excludes: true,
            include_hidden: false,
        }
    }

    /// Add an exclude pattern.
    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.exclude_patterns.push(pattern.to_string());
        self
    }

    /// Disable default excludes.
    pub fn without_default_excludes(mut self) -> Self {
        self.default_excludes = false;
        self
    }

    /// Include hidden files.
    pub fn include_hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }

    /// Scan the tree under `root` and return every discovered endpoint, in
    /// directory-listing order. Ordering is filesystem-dependent; callers
    /// must not assume it is stable across filesystems.
    pub fn discover(&self, root: &Path) -> Result<Vec<EndpointRecord>> {
        if !root.is_dir() {
            return Err(crate::errors::Error::Scan {
                message: "scan root is not a directory".to_string(),
                path: root.to_path_buf(),
            });
        }

        let default_excludes = if self.default_excludes {
            build_globset(default_exclude_patterns())?
        } else {
            build_globset([])?
        };
        let user_excludes = build_globset(self.exclude_patterns.iter().map(|s| s.as_str()))?;

        let walker = WalkBuilder::new(root)
            .hidden(!self.include_hidden)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .build();

        let mut endpoints = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let rel = path.strip_prefix(root).unwrap_or(path);
            if default_excludes.is_match(rel) || user_excludes.is_match(rel) {
                continue;
            }

            let Some(front_end) = parsing::front_end_for(path) else {
                continue;
            };

            match self.scan_file(path, front_end.as_ref()) {
                Ok(found) => endpoints.extend(found),
                Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
            }
        }

        tracing::info!(
            "discovered {} endpoints under {}",
            endpoints.len(),
            root.display()
        );
        Ok(endpoints)
    }

    /// Scan one source file for route registrations.
    fn scan_file(&self, path: &Path, front_end: &dyn FrontEnd) -> Result<Vec<EndpointRecord>> {
        let source = std::fs::read_to_string(path)?;
        let tree = front_end.parse(&source, path)?;
        let bytes = source.as_bytes();

        let resource = normalize::resource_name(path);
        let prefix = normalize::route_prefix(path);
        let resolver = Resolver::new(front_end);

        let mut route_calls = Vec::new();
        parsing::visit(tree.root_node(), &mut |node| {
            if let Some(call) = self.framework.match_route_call(node, &self.receiver, bytes) {
                route_calls.push(call);
            }
        });

        let mut endpoints = Vec::with_capacity(route_calls.len());
        for call in route_calls {
            let headers = extract::extract_headers(call.options, bytes);
            let query_parameters = extract::extract_query_params(&call.path);

            // Every handler candidate is tried in argument order; a later
            // successful resolution overwrites earlier metadata (last-wins).
            let mut body = crate::types::BodyShape::new();
            let mut description = None;
            let mut handler_name = None;
            for reference in &call.handlers {
                if let Some(definition) = resolver.resolve(reference, path, &source, &tree) {
                    body = extract::extract_body(
                        definition.node(),
                        definition.source.as_bytes(),
                    );
                    description = extract::extract_description(&definition);
                    handler_name = definition.name.clone();
                }
            }

            endpoints.push(EndpointRecord {
                method: call.method,
                path: format!("{}{}", prefix, call.path),
                headers,
                query_parameters,
                body,
                description,
                source_file: path.to_path_buf(),
                resource_name: resource.clone(),
                handler_name,
            });
        }

        Ok(endpoints)
    }
}

fn default_exclude_patterns() -> Vec<&'static str> {
    vec![
        "**/.git/**",
        "**/node_modules/**",
        "**/dist/**",
        "**/build/**",
        "**/out/**",
        "**/coverage/**",
        "**/vendor/**",
        "**/.next/**",
        "**/package-lock.json",
        "**/yarn.lock",
        "**/pnpm-lock.yaml",
        "**/*.min.js",
        "**/*.map",
        "**/*.d.ts",
    ]
}

fn build_globset<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|e| crate::errors::Error::Config {
            message: format!("invalid exclude pattern: {e}"),
        })?);
    }
    builder.build().map_err(|e| crate::errors::Error::Config {
        message: format!("invalid exclude set: {e}"),
    })
}
