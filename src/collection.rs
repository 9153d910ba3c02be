//! Postman collection emitter.
//!
//! Maps resource groups into the collection v2.1 JSON schema: one folder per
//! resource, one item per endpoint. This is a plain serialization layer; all
//! inference happens upstream.

use crate::errors::{Error, Result};
use crate::types::{BodyShape, Header, ResourceGroup};
use serde::Serialize;
use std::path::Path;

const SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Debug, Serialize)]
pub struct PostmanCollection {
    pub info: CollectionInfo,
    pub item: Vec<CollectionFolder>,
}

#[derive(Debug, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub description: String,
    pub schema: String,
}

/// One folder per resource group.
#[derive(Debug, Serialize)]
pub struct CollectionFolder {
    pub name: String,
    pub item: Vec<CollectionItem>,
}

#[derive(Debug, Serialize)]
pub struct CollectionItem {
    pub name: String,
    pub request: RequestSpec,
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RequestSpec {
    pub url: String,
    /// Lowercase method, matching the schema's convention.
    pub method: String,
    pub header: Vec<Header>,
    pub body: BodyShape,
    pub description: String,
}

/// Build a collection from grouped endpoints, prefixing every URL with
/// `base_url`.
pub fn build_collection(
    groups: &[ResourceGroup],
    base_url: &str,
    name: &str,
) -> PostmanCollection {
    let item = groups
        .iter()
        .map(|group| CollectionFolder {
            name: group.name.clone(),
            item: group
                .endpoints
                .iter()
                .map(|endpoint| {
                    let url = format!("{}{}", base_url, endpoint.path);
                    CollectionItem {
                        name: format!("{} {}", endpoint.method, url),
                        request: RequestSpec {
                            url,
                            method: endpoint.method.as_str().to_lowercase(),
                            header: endpoint.headers.clone(),
                            body: endpoint.body.clone(),
                            description: endpoint
                                .description
                                .clone()
                                .unwrap_or_else(|| endpoint.source_file.display().to_string()),
                        },
                        response: Vec::new(),
                    }
                })
                .collect(),
        })
        .collect();

    PostmanCollection {
        info: CollectionInfo {
            name: name.to_string(),
            description: "Collection generated from statically discovered routes".to_string(),
            schema: SCHEMA_URL.to_string(),
        },
        item,
    }
}

/// Write a collection as pretty-printed JSON.
pub fn write_collection(collection: &PostmanCollection, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(collection)?;
    std::fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("collection saved to {}", path.display());
    Ok(())
}
