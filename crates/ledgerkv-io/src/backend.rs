//! The [`LogBackend`] trait abstracts the log engine's view of on-disk
//! storage down to the narrow contract it actually needs: open a handle
//! under a small set of flags, then read, write, seek and measure it.
//!
//! This lets the engine stay agnostic to whether the log lives in a single
//! file or across a set of rotated segment files — both are provided in
//! this crate as [`LogBackend`] implementations ([`MonolithicBackend`] and
//! [`SegmentedBackend`]).

use std::io::{Read, Seek, SeekFrom, Write};

use crate::IoError;

/// Flags controlling how a log file is opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing.
    pub write: bool,
    /// Create the file if it doesn't exist.
    pub create: bool,
    /// Open in append mode (writes always land at end-of-file).
    pub append: bool,
}

impl OpenFlags {
    /// Flags for reading an existing log, start to finish.
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }

    /// Flags for appending new records, creating the log if it is missing.
    pub fn append_create() -> Self {
        Self {
            read: true,
            write: true,
            create: true,
            append: true,
        }
    }
}

/// Anything that can stand in as the log's byte stream: readable, writable
/// and seekable. `std::fs::File` satisfies this directly; [`SegmentedBackend`]
/// satisfies it with a small adapter that fans reads and writes out across
/// its rotated segment files.
///
/// [`SegmentedBackend`]: crate::SegmentedBackend
pub trait RawStream: Read + Write + Seek + Send {}
impl<T: Read + Write + Seek + Send> RawStream for T {}

/// An open handle to a log backend.
///
/// Boxes the underlying stream so both a single `std::fs::File`
/// (monolithic backend) and a multi-file adapter (segmented backend) can
/// be returned from the same [`LogBackend::open`] call.
pub struct LogHandle {
    stream: Box<dyn RawStream>,
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle").finish_non_exhaustive()
    }
}

impl LogHandle {
    pub(crate) fn new(stream: impl RawStream + 'static) -> Self {
        Self {
            stream: Box::new(stream),
        }
    }

    /// Current position of the handle, equivalent to `tell()`.
    pub fn position(&mut self) -> Result<u64, IoError> {
        Ok(self.stream.stream_position()?)
    }
}

impl Read for LogHandle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for LogHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stream.flush()
    }
}

impl Seek for LogHandle {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.stream.seek(pos)
    }
}

/// Abstraction over where the log's bytes actually live.
///
/// Implementations are synchronous and opened fresh per operation — the
/// engine never holds a handle open across calls, matching its
/// single-writer, no-internal-locking resource model.
pub trait LogBackend: Send + Sync {
    /// Opens a handle to the logical log stream under the given flags.
    ///
    /// With [`OpenFlags::append_create`], creates an empty log if none
    /// exists yet (the "touch on first use" behavior the engine relies on
    /// during recovery).
    fn open(&self, flags: OpenFlags) -> Result<LogHandle, IoError>;

    /// Total size of the logical log stream, in bytes.
    fn size(&self) -> Result<u64, IoError>;
}
