use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("upload of {path} failed: {reason}")]
    Transport { path: PathBuf, reason: String },
}

/// Ships a persisted snapshot somewhere, tagged with the resolved name.
pub trait Uploader {
    fn upload(&self, image_path: &Path, tagged_name: &str) -> Result<(), UploadError>;
}
