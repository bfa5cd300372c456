//! I/O error types.

use std::path::PathBuf;

/// Errors from a [`LogBackend`](crate::LogBackend).
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Underlying OS I/O error.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The backend's directory does not exist.
    #[error("storage directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
}
