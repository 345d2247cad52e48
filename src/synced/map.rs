//! Generic map guarded by a single reader/writer lock.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::config;

/// Thread-safe map with an optional entry limit.
///
/// When a limit is set, new keys arriving while the map already holds `limit`
/// entries are silently dropped. Updates to existing keys always apply. The
/// limit is a best-effort capacity cap, not an eviction policy.
pub struct SyncedMap<K, V> {
    m: RwLock<HashMap<K, V>>,
    limit: Option<usize>,
}

impl<K, V> SyncedMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an unbounded map.
    pub fn new() -> Self {
        Self {
            m: RwLock::new(HashMap::new()),
            limit: None,
        }
    }

    /// Creates a map that holds at most `limit` entries. Zero means unbounded.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            m: RwLock::new(HashMap::with_capacity(limit)),
            limit: (limit > 0).then_some(limit),
        }
    }

    pub fn from_config(cfg: &config::Synced) -> Self {
        Self::with_limit(cfg.limit)
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn length(&self) -> usize {
        self.m.read().len()
    }

    pub fn exists(&self, key: &K) -> bool {
        self.m.read().contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.m.read().get(key).cloned()
    }

    /// Copy of all entries.
    pub fn range(&self) -> HashMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.m.read().clone()
    }

    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.m.read().keys().cloned().collect()
    }

    /// Calls `f` for each entry under the read lock until it returns false.
    pub fn iterate<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let m = self.m.read();
        for (k, v) in m.iter() {
            if !f(k, v) {
                return;
            }
        }
    }

    fn set_locked(&self, m: &mut HashMap<K, V>, key: K, value: V) -> bool {
        if let Some(slot) = m.get_mut(&key) {
            *slot = value;
            return true;
        }
        if self.limit.is_some_and(|limit| m.len() >= limit) {
            return false;
        }
        m.insert(key, value);
        true
    }

    /// Inserts or updates `key`.
    pub fn set(&self, key: K, value: V) {
        let mut m = self.m.write();
        self.set_locked(&mut m, key, value);
    }

    /// Sets every key to a clone of `value`.
    pub fn set_multi(&self, keys: impl IntoIterator<Item = K>, value: V)
    where
        V: Clone,
    {
        let mut m = self.m.write();
        for key in keys {
            self.set_locked(&mut m, key, value.clone());
        }
    }

    /// Inserts `value` only if `key` is absent.
    ///
    /// Returns the value now stored for `key` (or `value` itself when the limit
    /// rejected the insert) and whether this call inserted it.
    pub fn set_if_not_exists(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        let mut m = self.m.write();
        if let Some(existing) = m.get(&key) {
            return (existing.clone(), false);
        }
        let stored = value.clone();
        let inserted = self.set_locked(&mut m, key, value);
        (stored, inserted)
    }

    /// Removes `key`. Always returns true.
    pub fn delete(&self, key: &K) -> bool {
        self.m.write().remove(key);
        true
    }

    /// Removes all `keys` under one lock. Always returns true.
    pub fn delete_batch(&self, keys: &[K]) -> bool {
        let mut m = self.m.write();
        for key in keys {
            m.remove(key);
        }
        true
    }

    /// Removes every entry. Always returns true.
    pub fn clear(&self) -> bool {
        self.m.write().clear();
        true
    }
}

impl<K: Eq + Hash, V> Default for SyncedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
