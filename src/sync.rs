//! Postman workspace synchronization.
//!
//! Update-if-exists, else create: the workspace's collections are listed,
//! matched by collection name, and the collection is PUT to the existing UID
//! or POSTed as new. Failures surface as [`Error::Sync`]; retry policy, if
//! any, belongs to the caller.

use crate::collection::PostmanCollection;
use crate::errors::{Error, Result};
use serde_json::Value;

const POSTMAN_API_BASE: &str = "https://api.getpostman.com";

/// Outcome of a workspace sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// An existing collection with the same name was updated.
    Updated { uid: String },
    /// No collection with that name existed; a new one was created.
    Created { uid: String },
}

/// Synchronize a collection with a Postman workspace.
pub fn sync_collection(
    api_key: &str,
    workspace_id: &str,
    collection: &PostmanCollection,
) -> Result<SyncOutcome> {
    sync_with_base(POSTMAN_API_BASE, api_key, workspace_id, collection)
}

fn sync_with_base(
    base: &str,
    api_key: &str,
    workspace_id: &str,
    collection: &PostmanCollection,
) -> Result<SyncOutcome> {
    tracing::info!("syncing collection '{}'", collection.info.name);
    let client = reqwest::blocking::Client::new();

    let listing: Value = client
        .get(format!("{base}/collections"))
        .header("X-Api-Key", api_key)
        .query(&[("workspace", workspace_id)])
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.json())
        .map_err(sync_error("listing workspace collections"))?;

    let existing_uid = find_existing_uid(&listing, &collection.info.name);
    let payload = serde_json::json!({ "collection": collection });

    match existing_uid {
        Some(uid) => {
            client
                .put(format!("{base}/collections/{uid}"))
                .header("X-Api-Key", api_key)
                .json(&payload)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(sync_error("updating collection"))?;
            Ok(SyncOutcome::Updated { uid })
        }
        None => {
            let created: Value = client
                .post(format!("{base}/collections"))
                .header("X-Api-Key", api_key)
                .query(&[("workspace", workspace_id)])
                .json(&payload)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.json())
                .map_err(sync_error("creating collection"))?;
            let uid = created["collection"]["uid"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            Ok(SyncOutcome::Created { uid })
        }
    }
}

/// UID of the workspace collection whose name matches, if any.
fn find_existing_uid(listing: &Value, name: &str) -> Option<String> {
    listing["collections"]
        .as_array()?
        .iter()
        .find(|c| c["name"].as_str() == Some(name))
        .and_then(|c| c["uid"].as_str())
        .map(|uid| uid.to_string())
}

fn sync_error(context: &'static str) -> impl Fn(reqwest::Error) -> Error {
    move |e| Error::Sync {
        message: format!("{context}: {e}"),
    }
}
