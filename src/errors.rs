//! Error types for discovery, emission, and workspace sync.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by routelens operations.
///
/// Per-file parse failures and handler-resolution failures are handled
/// internally (skip and log) and never reach this enum; see the module docs
/// on [`crate::discovery`] and [`crate::resolve`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("scan error: {message} (path: {path})")]
    Scan { message: String, path: PathBuf },

    #[error("parse error in {path}")]
    Parse { path: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("failed to write collection to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workspace sync failed: {message}")]
    Sync { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
