use std::time::{Duration, Instant};

use crate::capture::domain::camera_device::CameraDevice;
use crate::capture::domain::frame_source::CaptureError;
use crate::shared::frame::Frame;

/// Live camera (e.g. `/dev/video0`) opened through libavdevice.
///
/// `start` opens the device input, which starts the V4L2 stream; `stop`
/// drops the input context, which releases it. Decoded frames are converted
/// to RGB24 and scaled to the configured output size.
///
/// The device keeps streaming into its buffers between `start` and
/// `read_frame`. Frames queued during that time are skipped so the returned
/// frame is taken after the settle delay.
pub struct FfmpegCamera {
    device: String,
    width: u32,
    height: u32,
    stream: Option<CameraStream>,
}

struct CameraStream {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    stream_index: usize,
    tick_secs: f64,
    opened_at: Instant,
}

/// Packets this close to the read request still count as fresh.
const FRESH_SLACK: Duration = Duration::from_millis(100);

/// Upper bound on packets skipped per read, in case timestamps never advance.
const MAX_SKIPPED_PACKETS: usize = 300;

impl FfmpegCamera {
    pub fn new(device: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            device: device.into(),
            width,
            height,
            stream: None,
        }
    }

    fn open_error(&self, reason: impl ToString) -> CaptureError {
        CaptureError::Open {
            device: self.device.clone(),
            reason: reason.to_string(),
        }
    }

    fn open_stream(&self) -> Result<CameraStream, CaptureError> {
        ffmpeg_next::init().map_err(|e| self.open_error(e))?;
        ffmpeg_next::device::register_all();

        let opened_at = Instant::now();
        let ictx = ffmpeg_next::format::input_with_dictionary(
            &self.device,
            ffmpeg_next::Dictionary::new(),
        )
        .map_err(|e| self.open_error(e))?;

        let (stream_index, tick_secs, decoder) = {
            let stream = ictx
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or_else(|| self.open_error("no video stream"))?;
            let codec_ctx =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
                    .map_err(|e| self.open_error(e))?;
            let decoder = codec_ctx
                .decoder()
                .video()
                .map_err(|e| self.open_error(e))?;
            (stream.index(), f64::from(stream.time_base()), decoder)
        };

        Ok(CameraStream {
            ictx,
            decoder,
            stream_index,
            tick_secs,
            opened_at,
        })
    }
}

impl CameraDevice for FfmpegCamera {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.stream.is_none() {
            self.stream = Some(self.open_stream()?);
            log::debug!("Camera {} started", self.device);
        }
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let (width, height) = (self.width, self.height);
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| CaptureError::Read("camera not started".into()))?;
        stream.next_frame(width, height)
    }

    fn stop(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("Camera {} stopped", self.device);
        }
    }
}

impl CameraStream {
    fn next_frame(&mut self, width: u32, height: u32) -> Result<Frame, CaptureError> {
        let read_err = |e: ffmpeg_next::Error| CaptureError::Read(e.to_string());
        let mut stale = StaleFilter::new(self.tick_secs, self.opened_at.elapsed());

        for (stream, packet) in self.ictx.packets() {
            if stream.index() != self.stream_index || stale.skip(packet.pts()) {
                continue;
            }
            self.decoder.send_packet(&packet).map_err(read_err)?;
            let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return to_rgb_frame(&decoded, width, height);
            }
        }
        Err(CaptureError::Read("camera stream ended".into()))
    }
}

/// Skips packets captured before the read was requested.
///
/// Packet timestamps are measured from the first packet seen, which was
/// captured right after the device was opened; `read_after` is how long
/// after opening the read began.
struct StaleFilter {
    tick_secs: f64,
    read_after: Duration,
    first_pts: Option<i64>,
    skipped: usize,
}

impl StaleFilter {
    fn new(tick_secs: f64, read_after: Duration) -> Self {
        Self {
            tick_secs,
            read_after,
            first_pts: None,
            skipped: 0,
        }
    }

    fn skip(&mut self, pts: Option<i64>) -> bool {
        let Some(pts) = pts else {
            return false;
        };
        if self.skipped >= MAX_SKIPPED_PACKETS {
            return false;
        }
        let first = *self.first_pts.get_or_insert(pts);
        let offset = (pts - first) as f64 * self.tick_secs;
        let cutoff = self.read_after.saturating_sub(FRESH_SLACK).as_secs_f64();
        let stale = offset < cutoff;
        if stale {
            self.skipped += 1;
        }
        stale
    }
}

fn to_rgb_frame(
    decoded: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Result<Frame, CaptureError> {
    let mut scaler = ffmpeg_next::software::scaling::Context::get(
        decoded.format(),
        decoded.width(),
        decoded.height(),
        ffmpeg_next::format::Pixel::RGB24,
        width,
        height,
        ffmpeg_next::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| CaptureError::Read(e.to_string()))?;

    let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
    scaler
        .run(decoded, &mut rgb)
        .map_err(|e| CaptureError::Read(e.to_string()))?;

    // Rows may be padded; copy only the visible pixels.
    let stride = rgb.stride(0);
    let data = rgb.data(0);
    let row_bytes = width as usize * 3;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    Ok(Frame::new(pixels, width, height, 3, 0))
}
