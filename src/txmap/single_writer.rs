//! Unsynchronized numeric maps for build-once, read-many workloads.
//!
//! These maps take no locks. They are not lock-free in the algorithmic sense
//! (there is no compare-and-swap or retry loop anywhere); they are simply
//! unsynchronized, and the only shared-state primitive is an atomic item
//! counter bumped on every successful put.
//!
//! The usage discipline is enforced by the borrow checker instead of by
//! convention:
//!
//! - Writes take `&mut self`. Populate the map from one thread, then share it
//!   (`&map` or `Arc<map>`) with any number of readers. No writer can exist
//!   while a reader holds a reference.
//! - Concurrent writers are possible only on disjoint buckets: hand each
//!   thread its own [`BucketWriter`] from
//!   [`SplitSingleWriterMap::buckets_mut`]. A writer accepts only keys that
//!   route to its bucket, so two threads can never write the same key.
//!
//! The intended workload is transaction deduplication during block
//! validation: the set is built once and then queried heavily.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::config;

use super::engine::{DefaultEngine, Engine};
use super::error::{Result, TxMapError};
use super::router::{bucket_for_u64, DEFAULT_BUCKETS};

/// Unsynchronized `u64 -> u64` map with an atomic item counter.
pub struct SingleWriterMap<E = DefaultEngine<u64, u64>> {
    table: E,
    len: AtomicU64,
}

impl<E: Engine<u64, u64>> SingleWriterMap<E> {
    pub fn new(length: usize) -> Self {
        Self {
            table: E::with_capacity(length),
            len: AtomicU64::new(0),
        }
    }

    /// Underlying table.
    pub fn map(&self) -> &E {
        &self.table
    }

    pub fn exists(&self, key: u64) -> bool {
        self.table.contains(&key)
    }

    /// Inserts `key` only if absent.
    pub fn put(&mut self, key: u64, value: u64) -> Result<()> {
        if self.table.contains(&key) {
            return Err(TxMapError::already_exists(key));
        }
        self.table.insert(key, value);
        self.len.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn get(&self, key: u64) -> Option<u64> {
        self.table.get(&key).copied()
    }

    /// Number of successful puts.
    pub fn length(&self) -> usize {
        self.len.load(Ordering::Relaxed) as usize
    }
}

/// Unsynchronized `u64 -> u64` map split over buckets by `key % buckets`.
///
/// Like [`SplitMap`](super::SplitMap), a map created with `n` buckets holds
/// `n + 1` bucket stores; routing only reaches `0..n`.
pub struct SplitSingleWriterMap<E = DefaultEngine<u64, u64>> {
    shards: Vec<SingleWriterMap<E>>,
    buckets: u64,
}

impl<E: Engine<u64, u64>> SplitSingleWriterMap<E> {
    /// Creates a map with the default 1024 buckets.
    pub fn new(length: usize) -> Self {
        Self::with_buckets(length, DEFAULT_BUCKETS as u64)
    }

    /// Creates a map with `buckets` buckets. Zero is raised to one.
    pub fn with_buckets(length: usize, buckets: u64) -> Self {
        let buckets = buckets.max(1);
        let per_bucket = (length as u64 / buckets) as usize;

        let shards = (0..=buckets).map(|_| SingleWriterMap::new(per_bucket)).collect();

        debug!(
            component = "single_writer_map",
            event = "constructed",
            buckets,
            per_bucket,
            "single-writer split map constructed"
        );

        Self { shards, buckets }
    }

    pub fn from_config(cfg: &config::SingleWriter) -> Self {
        Self::with_buckets(cfg.length, cfg.buckets.unwrap_or(DEFAULT_BUCKETS as u64))
    }

    pub fn buckets(&self) -> u64 {
        self.buckets
    }

    #[inline]
    pub fn bucket_for(&self, key: u64) -> usize {
        bucket_for_u64(key, self.buckets) as usize
    }

    /// Bucket stores, indexed by bucket.
    pub fn map(&self) -> &[SingleWriterMap<E>] {
        &self.shards
    }

    /// One writer per routed bucket, for populating disjoint buckets from
    /// separate threads.
    ///
    /// Writers only expose `put`, and only for keys that route to their own
    /// bucket, so the bucket stores themselves can't be swapped out and a key
    /// can't land where keyed lookups won't look. The extra store past the
    /// last routed bucket gets no writer.
    pub fn buckets_mut(&mut self) -> Vec<BucketWriter<'_, E>> {
        let buckets = self.buckets;
        self.shards
            .iter_mut()
            .take(buckets as usize)
            .enumerate()
            .map(|(bucket, store)| BucketWriter {
                bucket: bucket as u64,
                buckets,
                store,
            })
            .collect()
    }

    pub fn exists(&self, key: u64) -> bool {
        self.shards[self.bucket_for(key)].exists(key)
    }

    pub fn put(&mut self, key: u64, value: u64) -> Result<()> {
        let bucket = self.bucket_for(key);
        self.shards[bucket].put(key, value)
    }

    pub fn get(&self, key: u64) -> Option<u64> {
        self.shards[self.bucket_for(key)].get(key)
    }

    /// Sum of the bucket counters.
    pub fn length(&self) -> usize {
        self.shards.iter().map(|shard| shard.length()).sum()
    }
}

/// Exclusive write access to a single bucket of a [`SplitSingleWriterMap`].
pub struct BucketWriter<'a, E = DefaultEngine<u64, u64>> {
    bucket: u64,
    buckets: u64,
    store: &'a mut SingleWriterMap<E>,
}

impl<E: Engine<u64, u64>> BucketWriter<'_, E> {
    /// Bucket this writer owns.
    pub fn bucket(&self) -> u64 {
        self.bucket
    }

    /// Whether `key` routes to this writer's bucket.
    #[inline]
    pub fn owns(&self, key: u64) -> bool {
        bucket_for_u64(key, self.buckets) == self.bucket
    }

    /// Inserts `key` into the owned bucket. Keys routed elsewhere are
    /// rejected with `KeyNotInBucket`.
    pub fn put(&mut self, key: u64, value: u64) -> Result<()> {
        if !self.owns(key) {
            return Err(TxMapError::KeyNotInBucket {
                key,
                bucket: self.bucket,
                routed: bucket_for_u64(key, self.buckets),
            });
        }
        self.store.put(key, value)
    }

    /// Number of successful puts into the owned bucket.
    pub fn length(&self) -> usize {
        self.store.length()
    }
}
