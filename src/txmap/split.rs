//! Sharded transaction map.
//!
//! The key space is split into buckets, each an independent [`LockedMap`] with
//! its own lock. Keyed operations touch exactly one bucket, so operations on
//! different buckets never contend. Whole-map reads (`length`, `keys`, `map`)
//! visit the buckets one after another, locking each in turn; under concurrent
//! writes they see an interleaving of states, never a global snapshot.

use std::ops::ControlFlow;

use tracing::debug;

use crate::config;
use crate::hash::Hash;

use super::engine::{DefaultEngine, Engine};
use super::error::{Result, TxMapError};
use super::locked::{LockedMap, TxMap};
use super::router::{bucket_for_hash, DEFAULT_BUCKETS};

/// Transaction map split over independently locked buckets.
///
/// A map created with `n` buckets holds `n + 1` bucket stores: indices
/// `0..=n`. Routing only ever produces `0..n`; the last store is reachable
/// through [`SplitMap::put_multi_bucket`] alone.
pub struct SplitMap<E = DefaultEngine<Hash, u64>> {
    // None only when a bucket was removed via `remove_bucket` (tests).
    shards: Vec<Option<LockedMap<E>>>,
    buckets: u16,
}

impl<E: Engine<Hash, u64>> SplitMap<E> {
    /// Creates a map with the default 1024 buckets. `length` is the expected
    /// total number of entries and is spread evenly over the buckets.
    pub fn new(length: usize) -> Self {
        Self::with_buckets(length, DEFAULT_BUCKETS)
    }

    /// Creates a map with `buckets` buckets. Zero is raised to one.
    pub fn with_buckets(length: usize, buckets: u16) -> Self {
        let buckets = buckets.max(1);
        let per_bucket = length.div_ceil(buckets as usize);

        let mut shards = Vec::with_capacity(buckets as usize + 1);
        for _ in 0..=buckets {
            shards.push(Some(LockedMap::new(per_bucket)));
        }

        debug!(
            component = "split_map",
            event = "constructed",
            buckets,
            per_bucket,
            "split map constructed"
        );

        Self { shards, buckets }
    }

    pub fn from_config(cfg: &config::Split) -> Self {
        Self::with_buckets(cfg.length, cfg.buckets.unwrap_or(DEFAULT_BUCKETS))
    }

    /// Configured bucket count.
    pub fn buckets(&self) -> u16 {
        self.buckets
    }

    /// Bucket a hash routes to.
    #[inline]
    pub fn bucket_for(&self, hash: &Hash) -> u16 {
        bucket_for_hash(hash, self.buckets)
    }

    #[inline]
    fn shard(&self, bucket: u16) -> Result<&LockedMap<E>> {
        self.shards
            .get(bucket as usize)
            .and_then(Option::as_ref)
            .ok_or(TxMapError::BucketDoesNotExist {
                bucket: bucket as u64,
                max: self.buckets as u64,
            })
    }

    fn live_shards(&self) -> impl Iterator<Item = &LockedMap<E>> {
        self.shards.iter().flatten()
    }

    /// Detaches a bucket store from the table. Keys routed to it then report
    /// `BucketDoesNotExist`.
    #[cfg(test)]
    pub(crate) fn remove_bucket(&mut self, bucket: u16) -> Option<LockedMap<E>> {
        self.shards.get_mut(bucket as usize).and_then(Option::take)
    }
}

impl<E> SplitMap<E>
where
    E: Engine<Hash, u64> + Send + Sync,
{
    /// Inserts hashes straight into `bucket`, bypassing routing.
    ///
    /// Fails with `BucketDoesNotExist` when `bucket` is past the configured
    /// count. The caller is responsible for `bucket` matching the routing of
    /// each hash; hashes placed elsewhere are not found by keyed lookups.
    pub fn put_multi_bucket(&self, bucket: u16, hashes: &[Hash], value: u64) -> Result<()> {
        if bucket > self.buckets {
            return Err(TxMapError::BucketDoesNotExist {
                bucket: bucket as u64,
                max: self.buckets as u64,
            });
        }
        self.shard(bucket)?.put_multi(hashes, value)
    }

    /// Builds a flattened, non-sharded copy of the current contents.
    ///
    /// Each bucket is copied under its own read lock; the result is not a
    /// consistent snapshot of the whole map under concurrent writes.
    pub fn map(&self) -> LockedMap<E> {
        let length = self.length();
        let out = LockedMap::new(length);
        for shard in self.live_shards() {
            shard.iter(&mut |hash, value| {
                // Buckets are disjoint, so a duplicate can only come from
                // put_multi_bucket misplacement; the first copy wins.
                let _ = out.put(*hash, value);
                ControlFlow::Continue(())
            });
        }

        debug!(
            component = "split_map",
            event = "flattened",
            length = out.length(),
            "split map flattened"
        );

        out
    }
}

impl<E> TxMap for SplitMap<E>
where
    E: Engine<Hash, u64> + Send + Sync,
{
    fn put(&self, hash: Hash, value: u64) -> Result<()> {
        self.shard(self.bucket_for(&hash))?.put(hash, value)
    }

    /// Puts each hash into its bucket in order. The first failure is returned
    /// wrapped in `PutMulti` with the bucket index; earlier hashes stay.
    fn put_multi(&self, hashes: &[Hash], value: u64) -> Result<()> {
        for hash in hashes {
            let bucket = self.bucket_for(hash);
            self.shard(bucket)
                .and_then(|shard| shard.put(*hash, value))
                .map_err(|source| TxMapError::PutMulti {
                    bucket: bucket as u64,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    fn get(&self, hash: &Hash) -> Option<u64> {
        self.shard(self.bucket_for(hash)).ok()?.get(hash)
    }

    fn exists(&self, hash: &Hash) -> bool {
        self.shard(self.bucket_for(hash))
            .map(|shard| shard.exists(hash))
            .unwrap_or(false)
    }

    fn set(&self, hash: Hash, value: u64) -> Result<()> {
        self.shard(self.bucket_for(&hash))?.set(hash, value)
    }

    fn set_if_exists(&self, hash: Hash, value: u64) -> bool {
        self.shard(self.bucket_for(&hash))
            .map(|shard| shard.set_if_exists(hash, value))
            .unwrap_or(false)
    }

    fn set_if_not_exists(&self, hash: Hash, value: u64) -> bool {
        self.shard(self.bucket_for(&hash))
            .map(|shard| shard.set_if_not_exists(hash, value))
            .unwrap_or(false)
    }

    fn delete(&self, hash: &Hash) -> Result<()> {
        let shard = self.shard(self.bucket_for(hash))?;
        if !shard.exists(hash) {
            return Err(TxMapError::does_not_exist(hash));
        }
        shard.delete(hash)
    }

    fn length(&self) -> usize {
        self.live_shards().map(|shard| shard.length()).sum()
    }

    fn keys(&self) -> Vec<Hash> {
        let mut keys = Vec::with_capacity(self.length());
        for shard in self.live_shards() {
            keys.extend(shard.keys());
        }
        keys
    }

    /// Walks the buckets in index order. `Break` ends the walk of the current
    /// bucket only; iteration resumes with the next bucket.
    fn iter(&self, f: &mut dyn FnMut(&Hash, u64) -> ControlFlow<()>) {
        for shard in self.live_shards() {
            shard.iter(f);
        }
    }
}
