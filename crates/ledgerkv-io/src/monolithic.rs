//! Single-file log backend.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::backend::{LogBackend, LogHandle, OpenFlags};
use crate::error::IoError;

/// Stores the entire log as one file on disk.
///
/// Mirrors the original system's monolithic storage: the file is created
/// on first use if it does not already exist, and every operation opens
/// the file fresh rather than holding a descriptor across calls.
#[derive(Debug, Clone)]
pub struct MonolithicBackend {
    path: PathBuf,
}

impl MonolithicBackend {
    /// Creates a backend rooted at `path`. The file is not touched until
    /// the first [`LogBackend::open`] or [`LogBackend::size`] call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the backing log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogBackend for MonolithicBackend {
    fn open(&self, flags: OpenFlags) -> Result<LogHandle, IoError> {
        if flags.create {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(IoError::DirectoryNotFound {
                        path: parent.to_path_buf(),
                    });
                }
            }
        }

        let file = OpenOptions::new()
            .read(flags.read)
            .write(flags.write)
            .append(flags.append)
            .create(flags.create)
            .open(&self.path)?;

        tracing::debug!(path = %self.path.display(), ?flags, "opened monolithic log handle");
        Ok(LogHandle::new(file))
    }

    fn size(&self) -> Result<u64, IoError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn touch_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");
        let backend = MonolithicBackend::new(&path);

        assert_eq!(backend.size().unwrap(), 0);

        let mut handle = backend.open(OpenFlags::append_create()).unwrap();
        handle.write_all(b"hello").unwrap();
        drop(handle);

        assert_eq!(backend.size().unwrap(), 5);
    }

    #[test]
    fn read_only_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.db");
        let backend = MonolithicBackend::new(&path);

        let mut writer = backend.open(OpenFlags::append_create()).unwrap();
        writer.write_all(b"payload").unwrap();
        drop(writer);

        let mut reader = backend.open(OpenFlags::read_only()).unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"payload");
    }
}
