//! The log engine: orchestrates the file-handle collaborator, the record
//! codec and the key index into the store's public `set`/`get`/`delete`
//! contract.

use std::io::{Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;
use ledgerkv_io::{LogBackend, MonolithicBackend, OpenFlags};

use crate::error::StorageError;
use crate::index::KeyIndex;
use crate::record::{Operation, Record};

/// The public contract of the store, independent of what backs it.
///
/// Kept as a trait (rather than only the concrete [`LogStore`]) so callers
/// can depend on the operation set without committing to a particular
/// backend, and so a future compactor or mock store can stand in for
/// testing.
pub trait StorageEngine {
    /// Writes `value` for `key`, overwriting any previous value.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Reads the current value for `key`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if the key has no live entry. `InvalidOffset` if the
    /// index pointed somewhere the log no longer backs up (self-healed:
    /// the stale entry is evicted before the error is returned).
    /// `Corrupted` if the record at that offset cannot be decoded.
    fn get(&mut self, key: &[u8]) -> Result<Vec<u8>, StorageError>;

    /// Removes `key`. A no-op, not an error, if the key is already absent.
    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError>;
}

/// An append-only log store backed by any [`LogBackend`].
///
/// Single-writer, synchronous: every operation opens the backend fresh
/// (append-create for writes, read-only for reads) rather than holding a
/// handle open across calls, and nothing here does internal locking — the
/// caller owns exclusivity.
pub struct LogStore<B: LogBackend> {
    backend: B,
    index: KeyIndex,
}

impl LogStore<MonolithicBackend> {
    /// Opens (creating if necessary) a single-file log at `path`, running
    /// the recovery scan to rebuild the index.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open(MonolithicBackend::new(path.as_ref()))
    }
}

impl<B: LogBackend> LogStore<B> {
    /// Opens a log store over `backend`, running the recovery scan to
    /// rebuild the index from whatever the log already contains.
    pub fn open(backend: B) -> Result<Self, StorageError> {
        // Touch the log into existence before scanning it, matching the
        // original system's "open in append mode once, just to create it"
        // behavior.
        drop(backend.open(OpenFlags::append_create())?);

        let index = Self::recover(&backend)?;
        tracing::debug!(keys = index.len(), "recovered index from log");
        Ok(Self { backend, index })
    }

    fn recover(backend: &B) -> Result<KeyIndex, StorageError> {
        let span = tracing::debug_span!("recover");
        let _enter = span.enter();

        let mut index = KeyIndex::new();
        let mut reader = backend.open(OpenFlags::read_only())?;

        loop {
            let offset = reader.position()?;
            match Record::decode(&mut reader, offset)? {
                None => break,
                Some((record, _consumed)) => match record.operation {
                    Operation::Set => index.set(record.key.to_vec(), offset),
                    Operation::Delete => index.delete(&record.key),
                },
            }
        }

        Ok(index)
    }

    /// Number of live keys currently indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store currently holds no live keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Size in bytes of the backing log.
    pub fn log_size(&self) -> Result<u64, StorageError> {
        Ok(self.backend.size()?)
    }

    /// Iterates over currently-live keys, in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.index.keys()
    }
}

impl<B: LogBackend> StorageEngine for LogStore<B> {
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let offset = self.backend.size()?;
        let record = Record::new(Operation::Set, Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));

        let mut appender = self.backend.open(OpenFlags::append_create())?;
        record.encode(&mut appender)?;

        self.index.set(key.to_vec(), offset);
        tracing::debug!(offset, key_len = key.len(), value_len = value.len(), "set");
        Ok(())
    }

    fn get(&mut self, key: &[u8]) -> Result<Vec<u8>, StorageError> {
        let offset = self.index.get(key)?;

        let mut reader = self.backend.open(OpenFlags::read_only())?;
        reader.seek(SeekFrom::Start(offset))?;

        let decoded = Record::decode(&mut reader, offset)?;
        let Some((record, _consumed)) = decoded else {
            tracing::warn!(offset, "index pointed past end of log, self-healing");
            self.index.delete(key);
            return Err(StorageError::InvalidOffset { offset });
        };

        if record.operation != Operation::Set || record.key.as_ref() != key {
            tracing::warn!(offset, "index pointed at a stale or mismatched record, self-healing");
            self.index.delete(key);
            return Err(StorageError::InvalidOffset { offset });
        }

        Ok(record.value.to_vec())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StorageError> {
        if !self.index.has(key) {
            return Ok(());
        }

        let record = Record::new(Operation::Delete, Bytes::copy_from_slice(key), Bytes::new());
        let mut appender = self.backend.open(OpenFlags::append_create())?;
        record.encode(&mut appender)?;

        self.index.delete(key);
        tracing::debug!(key_len = key.len(), "delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, LogStore<MonolithicBackend>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");
        let store = LogStore::open_path(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn set_then_get() {
        let (_dir, mut store) = temp_store();
        store.set(b"key", b"value").unwrap();
        assert_eq!(store.get(b"key").unwrap(), b"value");
    }

    #[test]
    fn last_write_wins() {
        let (_dir, mut store) = temp_store();
        store.set(b"key", b"first").unwrap();
        store.set(b"key", b"second").unwrap();
        assert_eq!(store.get(b"key").unwrap(), b"second");
    }

    #[test]
    fn delete_then_get_fails() {
        let (_dir, mut store) = temp_store();
        store.set(b"key", b"value").unwrap();
        store.delete(b"key").unwrap();
        assert!(matches!(store.get(b"key"), Err(StorageError::KeyNotFound(_))));
    }

    #[test]
    fn delete_on_absent_key_is_idempotent() {
        let (_dir, mut store) = temp_store();
        store.delete(b"missing").unwrap();
        store.delete(b"missing").unwrap();
    }

    #[test]
    fn delete_then_set_restores_key() {
        let (_dir, mut store) = temp_store();
        store.set(b"key", b"first").unwrap();
        store.delete(b"key").unwrap();
        store.set(b"key", b"second").unwrap();
        assert_eq!(store.get(b"key").unwrap(), b"second");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");

        {
            let mut store = LogStore::open_path(&path).unwrap();
            store.set(b"key", b"value").unwrap();
            store.set(b"other", b"thing").unwrap();
            store.delete(b"other").unwrap();
        }

        let mut reopened = LogStore::open_path(&path).unwrap();
        assert_eq!(reopened.get(b"key").unwrap(), b"value");
        assert!(reopened.get(b"other").is_err());
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn log_grows_monotonically() {
        let (_dir, mut store) = temp_store();
        let mut sizes = Vec::new();
        for i in 0..5 {
            store.set(format!("key{i}").as_bytes(), b"value").unwrap();
            sizes.push(store.log_size().unwrap());
        }
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn multiple_keys_are_isolated() {
        let (_dir, mut store) = temp_store();
        store.set(b"a", b"1").unwrap();
        store.set(b"b", b"2").unwrap();
        store.delete(b"a").unwrap();

        assert!(store.get(b"a").is_err());
        assert_eq!(store.get(b"b").unwrap(), b"2");
    }

    #[test]
    fn corrupted_log_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");
        {
            let mut store = LogStore::open_path(&path).unwrap();
            store.set(b"key", b"value").unwrap();
        }

        // Truncate the file mid-payload.
        let full = std::fs::read(&path).unwrap();
        std::fs::write(&path, &full[..full.len() - 1]).unwrap();

        let err = LogStore::open_path(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupted { .. }));
    }

    #[test]
    fn truncated_log_self_heals_to_invalid_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");

        let mut store = LogStore::open_path(&path).unwrap();
        store.set(b"key", b"value").unwrap();

        // Simulate external truncation to nothing, without reopening (so
        // the index still claims an entry for "key").
        std::fs::write(&path, []).unwrap();

        let err = store.get(b"key").unwrap_err();
        assert!(matches!(err, StorageError::InvalidOffset { .. }));
        assert!(store.get(b"key").is_err());
    }

    #[test]
    fn binary_safe_values() {
        let (_dir, mut store) = temp_store();
        let key = b"\x00\xff\x01key".to_vec();
        let value = vec![0u8; 4096];
        store.set(&key, &value).unwrap();
        assert_eq!(store.get(&key).unwrap(), value);
    }
}
