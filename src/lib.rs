#![allow(clippy::collapsible_if)]
#![allow(clippy::manual_map)]

//! routelens
//!
//! Static discovery of HTTP route registrations in JavaScript/TypeScript
//! source trees, normalized into a framework-agnostic endpoint model and
//! emitted as a Postman collection.
//!
//! # Architecture
//!
//! The pipeline runs leaf-first:
//!
//! 1. **Walker** ([`discovery`]): enumerates source files, gitignore-aware.
//! 2. **Front ends** ([`parsing`]): parse each file and expose a uniform
//!    pre-order traversal over the tree.
//! 3. **Recognizer** ([`framework`]): filters call sites down to route
//!    registrations for the configured framework and receiver object.
//! 4. **Resolver** ([`resolve`]): follows the registered handler to its real
//!    function body, across `import`/`require` edges when needed.
//! 5. **Extractor** ([`extract`]): infers headers, query parameters, body
//!    shape, and a doc-comment description from static syntax.
//! 6. **Normalizer** ([`normalize`]): derives resource names and version
//!    prefixes, and groups records per resource.
//!
//! The result feeds the [`collection`] emitter and, optionally, the
//! [`sync`] wrapper for a Postman workspace.
//!
//! # Usage
//!
//! ```ignore
//! use routelens::{EndpointDiscovery, Framework};
//!
//! let discovery = EndpointDiscovery::new(Framework::Express, "app");
//! let endpoints = discovery.discover(std::path::Path::new("./server"))?;
//! let groups = routelens::normalize::group_by_resource(endpoints);
//! ```

pub mod collection;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod extract;
pub mod framework;
pub mod normalize;
pub mod parsing;
pub mod resolve;
pub mod sync;
pub mod types;

// Re-exports
pub use config::Config;
pub use discovery::EndpointDiscovery;
pub use errors::{Error, Result};
pub use framework::Framework;
pub use types::{EndpointRecord, Header, HttpMethod, QueryParam, ResourceGroup};
