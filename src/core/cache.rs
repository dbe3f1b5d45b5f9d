//! Per-document memo of resolved queries
//!
//! Entries are keyed by the raw query string, byte for byte. Scalars and
//! arrays are stored as snapshots; groups are stored as an address (top-level
//! index followed by child indices) and re-read from the live tree on a hit.
//! Misses are cached too.

use crate::core::{group::Target, lookup::Miss};
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;

/// When the query cache is emptied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Every successful mutation clears the whole cache
    #[default]
    InvalidateOnWrite,
    /// Mutations leave the cache alone; only `reset_cache` clears it
    Retain,
}

pub(crate) type CachedLookup = Result<Target, Miss>;

/// Query results keyed by exact query text
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RefCell<HashMap<String, CachedLookup>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, query: &str) -> Option<CachedLookup> {
        let hit = self.entries.borrow().get(query).cloned();
        trace!(
            "cache {} for '{}'",
            if hit.is_some() { "hit" } else { "miss" },
            query
        );
        hit
    }

    pub(crate) fn insert(&self, query: &str, lookup: CachedLookup) {
        self.entries.borrow_mut().insert(query.to_string(), lookup);
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.borrow().contains_key(query)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Clone for QueryCache {
    fn clone(&self) -> Self {
        Self {
            entries: RefCell::new(self.entries.borrow().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_exact() {
        let cache = QueryCache::new();
        cache.insert("server.port", Ok(Target::Scalar("8080".into())));
        cache.insert("missing", Err(Miss::NotFound));

        assert!(cache.contains("server.port"));
        assert!(!cache.contains(" server.port"));
        assert!(!cache.contains("server.port "));
        assert_eq!(cache.get("missing"), Some(Err(Miss::NotFound)));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(CachePolicy::default(), CachePolicy::InvalidateOnWrite);
    }
}
