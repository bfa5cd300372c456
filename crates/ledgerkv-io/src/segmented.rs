//! Multi-file log backend.
//!
//! Presents a set of fixed-size segment files as one contiguous logical
//! byte stream, so the engine can use it through exactly the same
//! [`LogBackend`] contract as [`MonolithicBackend`](crate::MonolithicBackend).
//! Segment rotation and lookup are this backend's own concern; the engine
//! never sees segment boundaries.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::backend::{LogBackend, LogHandle, OpenFlags};
use crate::error::IoError;

const SEGMENT_EXT: &str = "seg";

fn segment_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("{index:010}.{SEGMENT_EXT}"))
}

/// Stores the log across segment files of at most `segment_size` bytes
/// each, rotating to a new segment once the current one is full.
#[derive(Debug, Clone)]
pub struct SegmentedBackend {
    dir: PathBuf,
    segment_size: u64,
}

impl SegmentedBackend {
    /// Creates a backend rooted at `dir`, rotating segments at
    /// `segment_size` bytes. `segment_size` must be greater than zero.
    pub fn new(dir: impl Into<PathBuf>, segment_size: u64) -> Self {
        assert!(segment_size > 0, "segment_size must be non-zero");
        Self {
            dir: dir.into(),
            segment_size,
        }
    }

    fn list_segments(&self) -> Result<Vec<(u32, u64)>, IoError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut segments = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SEGMENT_EXT) {
                continue;
            }
            let Some(index) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            let len = entry.metadata()?.len();
            segments.push((index, len));
        }
        segments.sort_by_key(|(index, _)| *index);
        Ok(segments)
    }
}

impl LogBackend for SegmentedBackend {
    fn open(&self, flags: OpenFlags) -> Result<LogHandle, IoError> {
        if flags.create {
            std::fs::create_dir_all(&self.dir)?;
        }

        let segments = self.list_segments()?;
        tracing::debug!(dir = %self.dir.display(), segments = segments.len(), "opened segmented log handle");
        Ok(LogHandle::new(SegmentedStream {
            dir: self.dir.clone(),
            segment_size: self.segment_size,
            segments,
            pos: 0,
        }))
    }

    fn size(&self) -> Result<u64, IoError> {
        Ok(self.list_segments()?.iter().map(|(_, len)| len).sum())
    }
}

/// Adapter presenting a set of segment files as one `Read + Write + Seek`
/// stream over a contiguous logical offset space.
struct SegmentedStream {
    dir: PathBuf,
    segment_size: u64,
    segments: Vec<(u32, u64)>,
    pos: u64,
}

impl SegmentedStream {
    /// Finds the segment containing logical position `pos`, returning
    /// `(index, segment_start_offset, segment_len)`.
    fn locate(&self, pos: u64) -> Option<(u32, u64, u64)> {
        let mut cumulative = 0u64;
        for &(index, len) in &self.segments {
            if pos < cumulative + len {
                return Some((index, cumulative, len));
            }
            cumulative += len;
        }
        None
    }

    fn total_len(&self) -> u64 {
        self.segments.iter().map(|(_, len)| *len).sum()
    }
}

impl Read for SegmentedStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut total = 0;
        while total < buf.len() {
            let Some((index, seg_start, seg_len)) = self.locate(self.pos) else {
                break;
            };
            let local_offset = self.pos - seg_start;
            let remaining_in_segment = seg_len - local_offset;
            let want = (buf.len() - total).min(remaining_in_segment as usize);
            if want == 0 {
                break;
            }

            let mut file = File::open(segment_path(&self.dir, index))?;
            file.seek(SeekFrom::Start(local_offset))?;
            let n = file.read(&mut buf[total..total + want])?;
            if n == 0 {
                break;
            }
            total += n;
            self.pos += n as u64;
        }
        Ok(total)
    }
}

impl Write for SegmentedStream {
    /// Always appends to the logical end of the stream, rolling to a new
    /// segment once the current one reaches `segment_size` — matching
    /// the append-mode semantics of a monolithic file, where the write
    /// position is ignored in favor of end-of-file.
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            if self.segments.is_empty() {
                self.segments.push((0, 0));
            }
            let (last_index, last_len) = *self.segments.last().expect("just ensured non-empty");
            let space = self.segment_size.saturating_sub(last_len);
            if space == 0 {
                self.segments.push((last_index + 1, 0));
                continue;
            }

            let chunk = (buf.len() - written).min(space as usize);
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(segment_path(&self.dir, last_index))?;
            file.write_all(&buf[written..written + chunk])?;
            written += chunk;

            let last = self.segments.last_mut().expect("just ensured non-empty");
            last.1 += chunk as u64;
        }
        self.pos = self.total_len();
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Seek for SegmentedStream {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        let total_len = self.total_len() as i64;
        let new_pos = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::End(n) => total_len + n,
            SeekFrom::Current(n) => self.pos as i64 + n,
        };
        if new_pos < 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek to a negative position",
            ));
        }
        self.pos = new_pos as u64;
        Ok(self.pos)
    }
}
