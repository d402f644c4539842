use std::thread;
use std::time::Duration;

use crate::capture::domain::camera_device::CameraDevice;
use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::frame::Frame;

/// Captures stills from a [`CameraDevice`], one stream session per frame.
///
/// Each capture starts the stream, waits `settle` for exposure and white
/// balance to converge, reads a single frame, then stops the stream. The
/// stop runs from a drop guard, so the device is never left streaming
/// between cycles, whether the read succeeds, fails, or panics.
pub struct CameraFrameSource {
    device: Box<dyn CameraDevice>,
    settle: Duration,
    captured: usize,
}

impl CameraFrameSource {
    pub fn new(device: Box<dyn CameraDevice>, settle: Duration) -> Self {
        Self {
            device,
            settle,
            captured: 0,
        }
    }
}

impl FrameSource for CameraFrameSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        let mut stream = ActiveStream {
            device: self.device.as_mut(),
        };
        stream.device.start()?;
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        let frame = stream.device.read_frame()?;
        drop(stream);

        self.captured += 1;
        Ok(frame.with_index(self.captured))
    }
}

struct ActiveStream<'a> {
    device: &'a mut dyn CameraDevice,
}

impl Drop for ActiveStream<'_> {
    fn drop(&mut self) {
        self.device.stop();
    }
}
