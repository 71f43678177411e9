//! In-memory read cache keyed by node URL.
//!
//! One [`ReadCache`] is owned by a cached client root and shared by every
//! node derived from it. Nothing is persisted and nothing is evicted;
//! entries only go away through invalidation.
//!
//! Each URL carries an epoch that every invalidation bumps. A miss hands
//! out a [`Ticket`] holding the epoch it saw, and [`ReadCache::fill`] drops
//! the fetched value if the epoch moved in the meantime or another fetch
//! already filled the slot. A write racing a read therefore can never leave
//! a value older than the write behind.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

#[derive(Debug, Default)]
struct Entry {
    epoch: u64,
    value: Option<Value>,
}

/// Proof of a cache miss, redeemed by [`ReadCache::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hit(Value),
    Miss(Ticket),
}

#[derive(Debug, Default)]
pub struct ReadCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup(&self, url: &str) -> Lookup {
        let mut entries = self.entries();
        let entry = entries.entry(url.to_string()).or_default();
        match &entry.value {
            Some(value) => Lookup::Hit(value.clone()),
            None => Lookup::Miss(Ticket { epoch: entry.epoch }),
        }
    }

    /// Store a fetched value. Returns `false` when the ticket is stale or
    /// the slot was already filled.
    pub fn fill(&self, url: &str, ticket: Ticket, value: Value) -> bool {
        let mut entries = self.entries();
        let entry = entries.entry(url.to_string()).or_default();
        if entry.epoch != ticket.epoch || entry.value.is_some() {
            return false;
        }
        entry.value = Some(value);
        true
    }

    /// Forget the value for `url` and void outstanding tickets for it.
    pub fn invalidate(&self, url: &str) {
        let mut entries = self.entries();
        let entry = entries.entry(url.to_string()).or_default();
        entry.epoch += 1;
        entry.value = None;
    }

    /// Invalidate every URL.
    pub fn clear(&self) {
        for entry in self.entries().values_mut() {
            entry.epoch += 1;
            entry.value = None;
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries()
            .get(url)
            .is_some_and(|entry| entry.value.is_some())
    }

    /// Number of URLs with a cached value.
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|entry| entry.value.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
