//! Scan configuration.
//!
//! Loaded from a JSON file with the conventional field names; every field is
//! optional and falls back to a default, so a missing config file is not an
//! error for callers that want the defaults.

use crate::errors::{Error, Result};
use crate::framework::Framework;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Root of the source tree to scan.
    pub directory_to_scan: PathBuf,
    pub framework: Framework,
    /// Name of the route-registration object instance in source code.
    pub object_instance: String,
    /// Base URL prepended to every request URL in the collection.
    pub base_url: String,
    /// Where the generated collection JSON is written.
    pub postman_collection_file: PathBuf,
    /// Name of the generated collection.
    pub collection_name: String,
    /// Postman API key, only needed for workspace sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Postman workspace to sync the collection into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory_to_scan: PathBuf::from("./"),
            framework: Framework::Express,
            object_instance: "app".to_string(),
            base_url: "http://localhost:3000".to_string(),
            postman_collection_file: PathBuf::from("./postman_collection.json"),
            collection_name: "API Collection".to_string(),
            api_key: None,
            workspace_id: None,
        }
    }
}

impl Config {
    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        serde_json::from_str(&text).map_err(|e| Error::Config {
            message: format!("cannot parse {}: {}", path.display(), e),
        })
    }
}
