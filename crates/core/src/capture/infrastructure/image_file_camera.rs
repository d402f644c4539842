use std::path::{Path, PathBuf};

use crate::capture::domain::camera_device::CameraDevice;
use crate::capture::domain::frame_source::CaptureError;
use crate::shared::frame::Frame;

/// Stand-in camera that "captures" a still image from disk.
///
/// The file is re-read on every capture, so it can be swapped while the
/// loop runs. Useful for bench testing a model without camera hardware.
pub struct ImageFileCamera {
    path: PathBuf,
    width: u32,
    height: u32,
    active: bool,
}

impl ImageFileCamera {
    pub fn new(path: &Path, width: u32, height: u32) -> Self {
        Self {
            path: path.to_path_buf(),
            width,
            height,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl CameraDevice for ImageFileCamera {
    fn start(&mut self) -> Result<(), CaptureError> {
        if !self.path.is_file() {
            return Err(CaptureError::Open {
                device: self.path.display().to_string(),
                reason: "file not found".into(),
            });
        }
        self.active = true;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.active {
            return Err(CaptureError::Read("camera not started".into()));
        }
        let img = image::open(&self.path)
            .map_err(|e| CaptureError::Read(format!("{}: {e}", self.path.display())))?
            .to_rgb8();

        let img = if img.dimensions() == (self.width, self.height) {
            img
        } else {
            image::imageops::resize(
                &img,
                self.width,
                self.height,
                image::imageops::FilterType::Triangle,
            )
        };

        Ok(Frame::new(img.into_raw(), self.width, self.height, 3, 0))
    }

    fn stop(&mut self) {
        self.active = false;
    }
}
