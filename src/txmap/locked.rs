//! Single-lock transaction maps.
//!
//! [`LockedMap`] is the bucket store every sharded map is built from: one table
//! behind one reader/writer lock. Reads (`get`, `exists`, `keys`, `iter`) share
//! the lock; every mutation takes it exclusively.

use std::ops::ControlFlow;

use parking_lot::RwLock;

use crate::hash::Hash;

use super::engine::{DefaultEngine, Engine};
use super::error::{Result, TxMapError};

/// Operations shared by every transaction map keyed by [`Hash`].
///
/// The trait is object safe so callers can hold a `dyn TxMap` and swap between
/// the sharded and non-sharded maps.
pub trait TxMap: Send + Sync {
    /// Inserts `hash` only if absent; an existing key is an error, never overwritten.
    fn put(&self, hash: Hash, value: u64) -> Result<()>;

    /// Puts each hash in order and stops at the first failure.
    /// Hashes inserted before the failure stay inserted.
    fn put_multi(&self, hashes: &[Hash], value: u64) -> Result<()>;

    fn get(&self, hash: &Hash) -> Option<u64>;

    fn exists(&self, hash: &Hash) -> bool;

    /// Updates an existing hash. Fails if the hash is absent.
    fn set(&self, hash: Hash, value: u64) -> Result<()>;

    /// Updates the hash if present. Returns whether the update was applied.
    fn set_if_exists(&self, hash: Hash, value: u64) -> bool;

    /// Inserts the hash if absent. Returns whether the insert was applied.
    fn set_if_not_exists(&self, hash: Hash, value: u64) -> bool;

    fn delete(&self, hash: &Hash) -> Result<()>;

    fn length(&self) -> usize;

    /// Snapshot of all keys, unordered.
    fn keys(&self) -> Vec<Hash>;

    /// Calls `f` for each entry. Returning `Break` stops the traversal of the
    /// table currently being walked; see the implementing type for whether
    /// that ends the whole iteration.
    fn iter(&self, f: &mut dyn FnMut(&Hash, u64) -> ControlFlow<()>);
}

/// Transaction map guarded by a single reader/writer lock.
pub struct LockedMap<E = DefaultEngine<Hash, u64>> {
    table: RwLock<E>,
}

impl<E: Engine<Hash, u64>> LockedMap<E> {
    /// Creates a map preallocated for `length` entries. The length is a hint,
    /// not a limit.
    pub fn new(length: usize) -> Self {
        Self {
            table: RwLock::new(E::with_capacity(length)),
        }
    }

    /// Read access to the underlying table for the lifetime of the guard.
    pub fn map(&self) -> parking_lot::RwLockReadGuard<'_, E> {
        self.table.read()
    }

    fn put_locked(table: &mut E, hash: Hash, value: u64) -> Result<()> {
        if table.contains(&hash) {
            return Err(TxMapError::already_exists(hash));
        }
        table.insert(hash, value);
        Ok(())
    }
}

impl<E: Engine<Hash, u64> + Default> Default for LockedMap<E> {
    fn default() -> Self {
        Self {
            table: RwLock::new(E::default()),
        }
    }
}

impl<E> TxMap for LockedMap<E>
where
    E: Engine<Hash, u64> + Send + Sync,
{
    fn put(&self, hash: Hash, value: u64) -> Result<()> {
        let mut table = self.table.write();
        Self::put_locked(&mut table, hash, value)
    }

    fn put_multi(&self, hashes: &[Hash], value: u64) -> Result<()> {
        let mut table = self.table.write();
        for hash in hashes {
            Self::put_locked(&mut table, *hash, value)?;
        }
        Ok(())
    }

    fn get(&self, hash: &Hash) -> Option<u64> {
        self.table.read().get(hash).copied()
    }

    fn exists(&self, hash: &Hash) -> bool {
        self.table.read().contains(hash)
    }

    fn set(&self, hash: Hash, value: u64) -> Result<()> {
        match self.table.write().get_mut(&hash) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(TxMapError::does_not_exist(hash)),
        }
    }

    fn set_if_exists(&self, hash: Hash, value: u64) -> bool {
        match self.table.write().get_mut(&hash) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn set_if_not_exists(&self, hash: Hash, value: u64) -> bool {
        let mut table = self.table.write();
        if table.contains(&hash) {
            return false;
        }
        table.insert(hash, value);
        true
    }

    fn delete(&self, hash: &Hash) -> Result<()> {
        match self.table.write().remove(hash) {
            Some(_) => Ok(()),
            None => Err(TxMapError::does_not_exist(hash)),
        }
    }

    fn length(&self) -> usize {
        self.table.read().len()
    }

    fn keys(&self) -> Vec<Hash> {
        let table = self.table.read();
        let mut keys = Vec::with_capacity(table.len());
        keys.extend(table.iter().map(|(k, _)| *k));
        keys
    }

    /// Walks the table under the read lock. `Break` ends the iteration.
    fn iter(&self, f: &mut dyn FnMut(&Hash, u64) -> ControlFlow<()>) {
        let table = self.table.read();
        for (k, v) in table.iter() {
            if f(k, *v).is_break() {
                return;
            }
        }
    }
}

/// Hash-only set guarded by a single reader/writer lock.
///
/// Values carry no meaning: `get` returns `Some(0)` for present hashes.
pub struct LockedSet<E = DefaultEngine<Hash, ()>> {
    table: RwLock<E>,
}

impl<E> LockedSet<E>
where
    E: Engine<Hash, ()>,
{
    pub fn new(length: usize) -> Self {
        Self {
            table: RwLock::new(E::with_capacity(length)),
        }
    }

    pub fn exists(&self, hash: &Hash) -> bool {
        self.table.read().contains(hash)
    }

    pub fn get(&self, hash: &Hash) -> Option<u64> {
        self.exists(hash).then_some(0)
    }

    /// Adds the hash. Adding a hash that is already present is a no-op.
    pub fn put(&self, hash: Hash) {
        self.table.write().insert(hash, ());
    }

    pub fn put_multi(&self, hashes: &[Hash]) {
        let mut table = self.table.write();
        for hash in hashes {
            table.insert(*hash, ());
        }
    }

    pub fn delete(&self, hash: &Hash) -> Result<()> {
        match self.table.write().remove(hash) {
            Some(()) => Ok(()),
            None => Err(TxMapError::does_not_exist(hash)),
        }
    }

    pub fn length(&self) -> usize {
        self.table.read().len()
    }

    pub fn keys(&self) -> Vec<Hash> {
        self.table.read().iter().map(|(k, _)| *k).collect()
    }

    pub fn iter<F>(&self, mut f: F)
    where
        F: FnMut(&Hash) -> ControlFlow<()>,
    {
        let table = self.table.read();
        for (k, _) in table.iter() {
            if f(k).is_break() {
                return;
            }
        }
    }
}
