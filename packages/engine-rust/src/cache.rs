//! Process-wide descriptor caches.
//!
//! One [`DescriptorCache`] maps an exact descriptor (literal value included)
//! to its compiled form. Concurrent misses on the same key may both compile;
//! compilation is pure, so whichever insert lands last is equivalent.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use pagedquery_core::{FilterDescriptor, SortDescriptor};

use crate::predicate::CompiledPredicate;
use crate::sort::CompiledOrdering;

/// Filter cache for record type `T`.
pub type FilterCache<T> = DescriptorCache<FilterDescriptor, CompiledPredicate<T>>;

/// Sort cache for record type `T`.
pub type SortCache<T> = DescriptorCache<SortDescriptor, CompiledOrdering<T>>;

// ---------------------------------------------------------------------------
// CacheStats
// ---------------------------------------------------------------------------

/// Point-in-time counters of one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

// ---------------------------------------------------------------------------
// DescriptorCache
// ---------------------------------------------------------------------------

enum Store<K, V> {
    /// Grows without bound; never evicts.
    Unbounded(DashMap<K, V>),
    /// Evicts cold entries once `capacity` is reached.
    Bounded(quick_cache::sync::Cache<K, V>),
}

/// Concurrent descriptor -> compiled-form cache.
pub struct DescriptorCache<K, V> {
    store: Store<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> DescriptorCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache that never evicts.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_store(Store::Unbounded(DashMap::new()))
    }

    /// Creates a cache holding at most roughly `capacity` entries.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self::with_store(Store::Bounded(quick_cache::sync::Cache::new(capacity.max(1))))
    }

    /// Unbounded when `capacity` is `None`, bounded otherwise.
    #[must_use]
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        capacity.map_or_else(Self::unbounded, Self::bounded)
    }

    fn with_store(store: Store<K, V>) -> Self {
        Self {
            store,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up `key`, counting the hit or miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let found = match &self.store {
            Store::Unbounded(map) => map.get(key).map(|entry| entry.value().clone()),
            Store::Bounded(cache) => cache.get(key),
        };
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: K, value: V) {
        match &self.store {
            Store::Unbounded(map) => {
                map.insert(key, value);
            }
            Store::Bounded(cache) => cache.insert(key, value),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.store {
            Store::Unbounded(map) => map.len(),
            Store::Bounded(cache) => cache.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        match &self.store {
            Store::Unbounded(map) => map.clear(),
            Store::Bounded(cache) => cache.clear(),
        }
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        matches!(self.store, Store::Bounded(_))
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<K, V> std::fmt::Debug for DescriptorCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("bounded", &self.is_bounded())
            .field("stats", &self.stats())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
