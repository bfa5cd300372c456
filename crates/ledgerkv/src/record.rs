//! The on-disk record format and its codec.
//!
//! ```text
//! [op: u8][key_size: u64 LE][value_size: u64 LE][key bytes][value bytes]
//! ```
//!
//! 17-byte header, little-endian, no padding, no checksum, no sentinel
//! markers. The codec has no knowledge of files, offsets as a concept of
//! "where things live", or the index — it only turns bytes into a
//! [`Record`] and back.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::StorageError;

/// Size in bytes of the fixed header: 1 (op) + 8 (key_size) + 8 (value_size).
pub const HEADER_SIZE: usize = 17;

/// What a record represents: a live write, or a tombstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A live key/value write.
    Set,
    /// A tombstone; the accompanying value is always empty.
    Delete,
}

impl Operation {
    pub(crate) fn as_byte(self) -> u8 {
        match self {
            Operation::Set => 0,
            Operation::Delete => 1,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Operation::Set),
            1 => Some(Operation::Delete),
            _ => None,
        }
    }
}

/// A single decoded (or to-be-encoded) log record.
#[derive(Debug, Clone)]
pub struct Record {
    pub operation: Operation,
    pub key: Bytes,
    pub value: Bytes,
}

impl Record {
    pub fn new(operation: Operation, key: Bytes, value: Bytes) -> Self {
        Self {
            operation,
            key,
            value,
        }
    }

    /// Writes this record to `writer` and returns the number of bytes
    /// written (`HEADER_SIZE + key.len() + value.len()`).
    ///
    /// Never flushes or calls `sync_all` — durability is the collaborator's
    /// concern, not the codec's.
    pub fn encode<W: Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_all(&[self.operation.as_byte()])?;
        writer.write_all(&(self.key.len() as u64).to_le_bytes())?;
        writer.write_all(&(self.value.len() as u64).to_le_bytes())?;
        writer.write_all(&self.key)?;
        writer.write_all(&self.value)?;
        Ok(HEADER_SIZE + self.key.len() + self.value.len())
    }

    /// Decodes one record from `reader`.
    ///
    /// `start_offset` is only used to annotate a `Corrupted` error with
    /// where in the log the bad bytes began; the codec itself does not
    /// track position.
    ///
    /// Returns:
    /// - `Ok(None)` if the stream was at a clean end (no header bytes at
    ///   all could be read) — there are no more records.
    /// - `Err(StorageError::Corrupted { .. })` if a short header, an
    ///   unknown operation byte, or a short payload was read.
    /// - `Ok(Some((record, bytes_consumed)))` otherwise.
    pub fn decode<R: Read>(
        reader: &mut R,
        start_offset: u64,
    ) -> Result<Option<(Record, usize)>, StorageError> {
        let mut header = [0u8; HEADER_SIZE];
        let header_read = read_upto(reader, &mut header)?;
        if header_read == 0 {
            return Ok(None);
        }
        if header_read < HEADER_SIZE {
            return Err(StorageError::Corrupted {
                offset: start_offset,
                cause: format!("truncated header: got {header_read} of {HEADER_SIZE} bytes"),
            });
        }

        let operation = Operation::from_byte(header[0]).ok_or_else(|| StorageError::Corrupted {
            offset: start_offset,
            cause: format!("unknown operation byte {:#04x}", header[0]),
        })?;
        let key_size = u64::from_le_bytes(
            header[1..9]
                .try_into()
                .expect("slice is exactly 8 bytes after bounds check"),
        ) as usize;
        let value_size = u64::from_le_bytes(
            header[9..17]
                .try_into()
                .expect("slice is exactly 8 bytes after bounds check"),
        ) as usize;

        let mut payload = vec![0u8; key_size + value_size];
        let payload_read = read_upto(reader, &mut payload)?;
        if payload_read < payload.len() {
            return Err(StorageError::Corrupted {
                offset: start_offset,
                cause: format!(
                    "truncated payload: got {payload_read} of {} bytes",
                    payload.len()
                ),
            });
        }

        let mut payload = Bytes::from(payload);
        let value = payload.split_off(key_size);
        let key = payload;

        Ok(Some((
            Record::new(operation, key, value),
            HEADER_SIZE + key_size + value_size,
        )))
    }
}

/// Reads into `buf` until it is full or the stream is at EOF, returning the
/// number of bytes actually read — unlike `Read::read_exact`, a short read
/// is reported rather than turned into an error, so the caller can tell a
/// clean EOF apart from a truncated record.
fn read_upto<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    Ok(total)
}
