//! Fixed-size 32-byte content-addressed keys.
//!
//! Display and parsing follow the chain-hash convention: the hex string is the
//! byte-reversed form of the stored bytes.

use std::fmt;
use std::str::FromStr;

/// Size of a hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Error types for hash parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashError {
    #[error("invalid hash string length {0}, expected {expected}", expected = HASH_SIZE * 2)]
    InvalidLength(usize),
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A 32-byte transaction (or block) hash.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Wraps raw bytes as stored on the wire.
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a hash whose leading bytes are `prefix`, zero-filled after.
    /// Input longer than 32 bytes is truncated.
    pub fn from_prefix(prefix: &[u8]) -> Self {
        let mut bytes = [0u8; HASH_SIZE];
        let n = prefix.len().min(HASH_SIZE);
        bytes[..n].copy_from_slice(&prefix[..n]);
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != HASH_SIZE * 2 {
            return Err(HashError::InvalidLength(s.len()));
        }
        let mut bytes = [0u8; HASH_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}
