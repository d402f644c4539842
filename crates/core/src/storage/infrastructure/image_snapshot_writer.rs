use std::fs;
use std::path::Path;

use crate::shared::frame::Frame;
use crate::storage::domain::snapshot_writer::{PersistError, SnapshotWriter};

/// Encodes frames with the `image` crate, format chosen by file extension.
///
/// The image is written next to the target and renamed over it, so a reader
/// (or the uploader) never sees a half-written snapshot.
pub struct ImageSnapshotWriter;

impl ImageSnapshotWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageSnapshotWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotWriter for ImageSnapshotWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), PersistError> {
        let write_err = |source: std::io::Error| PersistError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let format =
            image::ImageFormat::from_path(path).map_err(|e| PersistError::Encode(e.to_string()))?;
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or_else(|| PersistError::Encode("frame is not packed RGB".into()))?;

        let temp_path = path.with_extension("part");
        if let Err(e) = img.save_with_format(&temp_path, format) {
            let _ = fs::remove_file(&temp_path);
            return Err(PersistError::Encode(e.to_string()));
        }
        fs::rename(&temp_path, path).map_err(write_err)?;
        Ok(())
    }
}
