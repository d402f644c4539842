use std::path::Path;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
    #[error("failed to write snapshot to {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Persists the most recent frame to a fixed location.
pub trait SnapshotWriter {
    /// Replaces whatever snapshot is at `path` with `frame`.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), PersistError>;
}
