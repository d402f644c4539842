use crate::capture::domain::frame_source::CaptureError;
use crate::shared::frame::Frame;

/// Low-level camera with an explicit stream lifecycle.
///
/// `stop` must be safe to call when the stream never started or already
/// stopped.
pub trait CameraDevice {
    fn start(&mut self) -> Result<(), CaptureError>;

    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    fn stop(&mut self);
}
