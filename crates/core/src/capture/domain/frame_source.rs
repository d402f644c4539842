use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open camera {device}: {reason}")]
    Open { device: String, reason: String },
    #[error("failed to read frame: {0}")]
    Read(String),
}

/// Acquires one still frame per call.
pub trait FrameSource {
    fn capture(&mut self) -> Result<Frame, CaptureError>;
}
