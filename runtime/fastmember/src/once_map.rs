//! Insert-if-absent concurrent map.
//!
//! Entries are never removed or replaced. Concurrent misses on one key may
//! each build a value; the first insertion wins and every caller receives
//! the retained value, so all observers agree on one binding.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

/// Hit/miss counters of a `OnceMap`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OnceMapStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct OnceMap<K, V> {
    entries: DashMap<K, V, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> OnceMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        OnceMap {
            entries: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `key` without building.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Insert `value` unless `key` is already bound. Returns the retained
    /// value and whether this call inserted it.
    pub fn insert_if_absent(&self, key: K, value: V) -> (V, bool) {
        let mut inserted = false;
        let retained = self
            .entries
            .entry(key)
            .or_insert_with(|| {
                inserted = true;
                value
            })
            .value()
            .clone();
        (retained, inserted)
    }

    /// Infallible form of `get_or_try_insert_with`.
    pub fn get_or_insert_with(&self, key: &K, build: impl FnOnce() -> V) -> V
    where
        K: Clone,
    {
        if let Some(hit) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.insert_if_absent(key.clone(), build()).0
    }

    /// Return the value bound to `key`, building and inserting it on a miss.
    ///
    /// `build` runs without any map lock held. A failed build inserts nothing.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &K,
        build: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E>
    where
        K: Clone,
    {
        if let Some(hit) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let built = build()?;
        Ok(self.insert_if_absent(key.clone(), built).0)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> OnceMapStats {
        OnceMapStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<K, V> Default for OnceMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
