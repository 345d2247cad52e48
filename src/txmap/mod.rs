//! Concurrent maps keyed by transaction hashes.
//!
//! - [`LockedMap`]: one table behind one reader/writer lock.
//! - [`SplitMap`]: `LockedMap` buckets selected by the leading hash bytes.
//! - [`SingleWriterMap`] / [`SplitSingleWriterMap`]: unsynchronized numeric
//!   variants for build-once, read-many use.

pub mod engine;
pub mod error;
pub mod locked;
pub mod router;
pub mod single_writer;
pub mod split;

#[cfg(test)]
mod single_writer_test;

// Re-export main types
pub use engine::{DefaultEngine, Engine, Xxh3BuildHasher};
pub use error::{ErrorKind, Result, TxMapError};
pub use locked::{LockedMap, LockedSet, TxMap};
pub use router::{bucket_for_hash, bucket_for_u64, DEFAULT_BUCKETS};
pub use single_writer::{BucketWriter, SingleWriterMap, SplitSingleWriterMap};
pub use split::SplitMap;
