//! # doctree-rest
//!
//! Path-addressed client for hierarchical JSON stores exposed over REST
//! (`GET`/`PUT`/`PATCH`/`POST`/`DELETE` on `<url>.json`).
//!
//! A [`Node`] names one location in the tree. Navigation builds new nodes
//! without touching the network; every CRUD call is exactly one blocking
//! round trip.
//!
//! ```ignore
//! use doctree_rest::{Location, Node};
//!
//! let root = Node::new("https://tree.example.com", Some("secret"))?;
//! let users = root.child("users")?;
//!
//! // PUT https://tree.example.com/users/alice.json?auth=secret
//! users.child("alice")?.set(&serde_json::json!({"age": 30}))?;
//!
//! // POST, returns {"name": "<push key>"}
//! users.push(&serde_json::json!({"age": 25}))?;
//!
//! assert!(root.parent().is_none());
//! ```
//!
//! ## Caching
//!
//! [`CachedNode`] wraps a node with a [`ReadCache`]. Reads of a URL are
//! served from memory after the first fetch; any write through a cached
//! node drops that URL's entry first:
//!
//! ```ignore
//! let users = Node::new("https://tree.example.com", None)?.cached().child("users")?;
//! users.get()?; // network
//! users.get()?; // cache
//! users.remove()?;
//! users.get()?; // network
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod types;

mod cached;
mod location;
mod node;

pub use cache::ReadCache;
pub use cached::CachedNode;
pub use codec::Scalar;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use location::Location;
pub use node::Node;
pub use types::{HttpRequest, HttpResponse, Method};
