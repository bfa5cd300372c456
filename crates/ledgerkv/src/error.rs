//! Error taxonomy for the key index and the log engine.

use ledgerkv_io::IoError;

fn fmt_key(key: &[u8]) -> String {
    const MAX_SHOWN: usize = 32;
    let shown = &key[..key.len().min(MAX_SHOWN)];
    let text = String::from_utf8_lossy(shown);
    if key.len() > MAX_SHOWN {
        format!("{text:?}... ({} bytes)", key.len())
    } else {
        format!("{text:?}")
    }
}

/// Errors raised by [`KeyIndex`](crate::KeyIndex) in isolation.
///
/// A missing key is an expected outcome, not corruption or a fault — this
/// is the only variant the index itself can produce.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("key not found: {}", fmt_key(.0))]
    KeyNotFound(Vec<u8>),
}

/// Errors raised by [`LogStore`](crate::LogStore) and anything implementing
/// [`StorageEngine`](crate::StorageEngine).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested key has no live entry in the index.
    #[error("key not found: {}", fmt_key(.0))]
    KeyNotFound(Vec<u8>),

    /// The index pointed at `offset`, but the log no longer has a matching
    /// live record there. The stale index entry is evicted as a side
    /// effect of reporting this error.
    #[error("invalid offset {offset}: index and log disagree")]
    InvalidOffset { offset: u64 },

    /// The log holds a record the codec cannot interpret.
    #[error("log corrupted at offset {offset}: {cause}")]
    Corrupted { offset: u64, cause: String },

    /// The log's backing collaborator failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IndexError> for StorageError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::KeyNotFound(key) => StorageError::KeyNotFound(key),
        }
    }
}

impl From<IoError> for StorageError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Io { source } => StorageError::Io(source),
            other => StorageError::Io(std::io::Error::other(other)),
        }
    }
}
