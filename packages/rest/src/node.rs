//! Path nodes: URL handles into the document tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use url::{Position, Url};

use crate::cache::ReadCache;
use crate::cached::CachedNode;
use crate::codec;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::location::Location;
use crate::types::Method;

/// A handle to one location in a remote document tree.
///
/// Nodes are immutable; [`child`](Location::child) and
/// [`parent`](Location::parent) return new nodes that share the auth token
/// and transport of the node they came from.
///
/// The root URL goes through `url::Url` parsing, so its string form is the
/// normalized URL (lowercase scheme and host, default port dropped,
/// unsafe characters percent-encoded) rather than the input verbatim.
///
/// ```ignore
/// use doctree_rest::{Location, Node};
///
/// let root = Node::new("https://tree.example.com", Some("secret"))?;
/// let alice = root.child("users/alice")?;
///
/// alice.set(&serde_json::json!({"age": 30}))?;
/// let age: u32 = alice.child("age")?.get_as()?;
/// ```
#[derive(Clone)]
pub struct Node {
    url: Url,
    base_url: String,
    auth: Option<String>,
    dispatcher: Dispatcher,
}

impl Node {
    /// Create a root node using the reqwest transport and default settings.
    pub fn new(root_url: &str, auth: Option<&str>) -> Result<Self, Error> {
        Self::with_config(root_url, auth, Config::default())
    }

    /// Create a root node using the reqwest transport.
    pub fn with_config(root_url: &str, auth: Option<&str>, config: Config) -> Result<Self, Error> {
        let executor =
            ReqwestExecutor::new(config.timeout).map_err(|message| Error::Transport { message })?;
        Self::with_executor(root_url, auth, Arc::new(executor), &config)
    }

    /// Create a root node on top of a custom transport.
    pub fn with_executor(
        root_url: &str,
        auth: Option<&str>,
        executor: Arc<dyn HttpExecutor>,
        config: &Config,
    ) -> Result<Self, Error> {
        let url = Url::parse(root_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("'{}' is not a hierarchical URL", root_url),
            });
        }

        Ok(Self::from_parts(
            url,
            auth.map(str::to_string),
            Dispatcher::new(executor, config),
        ))
    }

    fn from_parts(mut url: Url, auth: Option<String>, dispatcher: Dispatcher) -> Self {
        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        let base_url = if url.path() == "/" {
            format!("{}{}", &url[..Position::BeforePath], &url[Position::AfterPath..])
        } else {
            url.as_str().to_string()
        };

        Self {
            url,
            base_url,
            auth,
            dispatcher,
        }
    }

    fn derive(&self, url: Url) -> Self {
        Self::from_parts(url, self.auth.clone(), self.dispatcher.clone())
    }

    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    /// The wire endpoint requests for this node go to.
    pub fn endpoint(&self) -> String {
        self.dispatcher.endpoint(&self.base_url)
    }

    /// Wrap this node with a fresh read cache.
    pub fn cached(self) -> CachedNode {
        CachedNode::new(self)
    }

    /// Wrap this node with a read cache shared with other nodes.
    pub fn cached_with(self, cache: Arc<ReadCache>) -> CachedNode {
        CachedNode::with_cache(self, cache)
    }

    fn send(
        &self,
        method: Method,
        body: Option<Value>,
        params: &HashMap<String, String>,
    ) -> Result<Value, Error> {
        self.dispatcher
            .dispatch(&self.base_url, self.auth.as_deref(), method, body, params)
    }

    fn send_body<T: Serialize + ?Sized>(&self, method: Method, data: &T) -> Result<Value, Error> {
        let body = codec::encode(data)?;
        self.send(method, Some(body), &HashMap::new())
    }
}

impl Location for Node {
    fn as_str(&self) -> &str {
        &self.base_url
    }

    fn child(&self, path: &str) -> Result<Self, Error> {
        let mut base = self.url.clone();
        let dir = format!("{}/", base.path().trim_end_matches('/'));
        base.set_path(&dir);

        let joined = base.join(path.trim_start_matches('/'))?;
        Ok(self.derive(joined))
    }

    fn parent(&self) -> Option<Self> {
        let segments: Vec<&str> = self
            .url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect();
        let (_, ancestors) = segments.split_last()?;

        let mut url = self.url.clone();
        url.set_path(&format!("/{}", ancestors.join("/")));
        url.set_query(None);
        url.set_fragment(None);
        Some(self.derive(url))
    }

    fn get(&self) -> Result<Value, Error> {
        self.send(Method::GET, None, &HashMap::new())
    }

    fn get_with(&self, params: &HashMap<String, String>) -> Result<Value, Error> {
        self.send(Method::GET, None, params)
    }

    fn put<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.send_body(Method::PUT, data)
    }

    fn patch<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.send_body(Method::PATCH, data)
    }

    fn post<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.send_body(Method::POST, data)
    }

    fn delete(&self) -> Result<Value, Error> {
        self.send(Method::DELETE, None, &HashMap::new())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("url", &self.base_url)
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.auth == other.auth
    }
}
