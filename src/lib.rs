//! Sharded in-memory maps keyed by 32-byte transaction hashes.

pub mod config;
pub mod hash;
pub mod synced;
pub mod txmap;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub use hash::Hash;
pub use txmap::{LockedMap, LockedSet, SplitMap, SplitSingleWriterMap, TxMap, TxMapError};
