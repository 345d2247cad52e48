//! Backend table engines.
//!
//! A bucket store only needs insert, lookup, delete and iteration from the
//! table behind it. Any single-threaded table providing those can be plugged
//! into [`LockedMap`](super::LockedMap), [`SplitMap`](super::SplitMap) or the
//! single-writer maps without touching routing or locking.

use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use xxhash_rust::xxh3::Xxh3;

/// Hasher builder for the default engine.
pub type Xxh3BuildHasher = BuildHasherDefault<Xxh3>;

/// Default engine: std `HashMap` hashed with xxh3.
pub type DefaultEngine<K, V> = HashMap<K, V, Xxh3BuildHasher>;

/// Capability contract of a single-threaded backend table.
///
/// Implementations do no synchronization of their own.
pub trait Engine<K, V> {
    /// Creates an empty table sized for roughly `capacity` entries.
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    fn get(&self, key: &K) -> Option<&V>;

    fn get_mut(&mut self, key: &K) -> Option<&mut V>;

    /// Inserts or overwrites, returning the previous value.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    fn remove(&mut self, key: &K) -> Option<V>;

    fn len(&self) -> usize;

    fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates all entries in unspecified order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;
}

impl<K, V, S> Engine<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn with_capacity(capacity: usize) -> Self {
        HashMap::with_capacity_and_hasher(capacity, S::default())
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        HashMap::insert(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn contains(&self, key: &K) -> bool {
        self.contains_key(key)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        HashMap::iter(self)
    }
}
