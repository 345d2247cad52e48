//! Error types for the transaction maps.

/// Error types returned by the maps in this module.
///
/// Every variant is a precondition violation by the caller. Nothing here is
/// transient and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxMapError {
    #[error("bucket does not exist: {bucket}, max bucket is {max}")]
    BucketDoesNotExist { bucket: u64, max: u64 },
    #[error("hash already exists: {key}")]
    HashAlreadyExists { key: String },
    #[error("hash does not exist: {key}")]
    HashDoesNotExist { key: String },
    #[error("key {key} routes to bucket {routed}, not bucket {bucket}")]
    KeyNotInBucket { key: u64, bucket: u64, routed: u64 },
    #[error("failed to put multi in bucket {bucket}")]
    PutMulti {
        bucket: u64,
        #[source]
        source: Box<TxMapError>,
    },
}

/// Identity of an error condition, independent of its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BucketDoesNotExist,
    HashAlreadyExists,
    HashDoesNotExist,
    KeyNotInBucket,
}

impl TxMapError {
    pub(crate) fn already_exists(key: impl ToString) -> Self {
        Self::HashAlreadyExists { key: key.to_string() }
    }

    pub(crate) fn does_not_exist(key: impl ToString) -> Self {
        Self::HashDoesNotExist { key: key.to_string() }
    }

    /// Returns the underlying condition, looking through `PutMulti` wrapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BucketDoesNotExist { .. } => ErrorKind::BucketDoesNotExist,
            Self::HashAlreadyExists { .. } => ErrorKind::HashAlreadyExists,
            Self::HashDoesNotExist { .. } => ErrorKind::HashDoesNotExist,
            Self::KeyNotInBucket { .. } => ErrorKind::KeyNotInBucket,
            Self::PutMulti { source, .. } => source.kind(),
        }
    }

    /// Shorthand for `self.kind() == kind`.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

pub type Result<T> = std::result::Result<T, TxMapError>;
