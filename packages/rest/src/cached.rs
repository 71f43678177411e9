//! Caching decorator over [`Node`].
//!
//! Reads are answered from a [`ReadCache`] once a URL has been fetched.
//! Every write invalidates the node's entry before the request is sent, so
//! the entry is gone even when the write fails.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{Lookup, ReadCache};
use crate::error::Error;
use crate::location::Location;
use crate::node::Node;

#[derive(Clone)]
pub struct CachedNode {
    inner: Node,
    cache: Arc<ReadCache>,
}

impl CachedNode {
    /// Wrap `node` with a fresh, empty cache.
    pub fn new(node: Node) -> Self {
        Self::with_cache(node, Arc::new(ReadCache::new()))
    }

    pub fn with_cache(node: Node, cache: Arc<ReadCache>) -> Self {
        Self { inner: node, cache }
    }

    pub fn cache(&self) -> &Arc<ReadCache> {
        &self.cache
    }

    /// The uncached node underneath.
    pub fn node(&self) -> &Node {
        &self.inner
    }

    fn wrap(&self, node: Node) -> Self {
        Self::with_cache(node, Arc::clone(&self.cache))
    }

    fn invalidate(&self) {
        log::debug!("cache invalidate {}", self.inner.as_str());
        self.cache.invalidate(self.inner.as_str());
    }
}

impl Location for CachedNode {
    fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    fn child(&self, path: &str) -> Result<Self, Error> {
        Ok(self.wrap(self.inner.child(path)?))
    }

    fn parent(&self) -> Option<Self> {
        self.inner.parent().map(|node| self.wrap(node))
    }

    fn get(&self) -> Result<Value, Error> {
        let url = self.inner.as_str();
        match self.cache.lookup(url) {
            Lookup::Hit(value) => {
                log::debug!("cache hit {}", url);
                Ok(value)
            }
            Lookup::Miss(ticket) => {
                log::debug!("cache miss {}", url);
                let value = self.inner.get()?;
                self.cache.fill(url, ticket, value.clone());
                Ok(value)
            }
        }
    }

    /// Parameterized reads bypass the cache.
    fn get_with(&self, params: &HashMap<String, String>) -> Result<Value, Error> {
        self.inner.get_with(params)
    }

    fn put<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.invalidate();
        self.inner.put(data)
    }

    fn patch<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.invalidate();
        self.inner.patch(data)
    }

    fn post<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.invalidate();
        self.inner.post(data)
    }

    fn delete(&self) -> Result<Value, Error> {
        self.invalidate();
        self.inner.delete()
    }
}

impl fmt::Display for CachedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for CachedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedNode")
            .field("node", &self.inner)
            .field("cached_urls", &self.cache.len())
            .finish()
    }
}
