//! Key to bucket routing.
//!
//! Both functions are pure: no state, no allocation, and the same inputs always
//! produce the same bucket. Keys are cryptographic hashes, so the leading 16 bits
//! already spread evenly and nothing past the second byte is read.

use byteorder::{BigEndian, ByteOrder};

use crate::hash::Hash;

/// Bucket count used when no override is given.
pub const DEFAULT_BUCKETS: u16 = 1024;

/// Maps a hash to its bucket: the first two bytes as a big-endian `u16`,
/// modulo `buckets`.
///
/// `buckets` must be non-zero.
#[inline]
pub fn bucket_for_hash(hash: &Hash, buckets: u16) -> u16 {
    BigEndian::read_u16(&hash.as_bytes()[..2]) % buckets
}

/// Maps a numeric key to its bucket: `key % buckets`.
///
/// `buckets` must be non-zero.
#[inline]
pub fn bucket_for_u64(key: u64, buckets: u64) -> u64 {
    key % buckets
}
