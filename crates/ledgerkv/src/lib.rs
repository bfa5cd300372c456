//! Embeddable, single-writer, append-only key-value store.
//!
//! An append-only log file is the durable source of truth; an in-memory
//! [`KeyIndex`] maps keys to the byte offset of their most recent record so
//! reads can seek straight to it instead of scanning the log. On open, the
//! index is rebuilt by a full sequential scan of the log.
//!
//! ```text
//! crates/ledgerkv/src/
//!   record.rs   — on-disk record format: encode/decode, no I/O policy
//!   index.rs    — in-memory key -> offset map, no durability of its own
//!   engine.rs   — orchestrates record.rs + index.rs + a LogBackend
//!   error.rs    — IndexError, StorageError
//! ```
//!
//! The engine is generic over [`ledgerkv_io::LogBackend`], so the same
//! [`LogStore`] works whether the log lives in one file
//! ([`ledgerkv_io::MonolithicBackend`]) or across rotated segment files
//! ([`ledgerkv_io::SegmentedBackend`]).

mod engine;
mod error;
mod index;
mod record;

pub use engine::{LogStore, StorageEngine};
pub use error::{IndexError, StorageError};
pub use index::KeyIndex;
pub use record::{Operation, Record, HEADER_SIZE};
