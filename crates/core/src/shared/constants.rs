use std::time::Duration;

pub const DEFAULT_LABELS_PATH: &str = "./faces-labels.txt";
pub const DEFAULT_MODEL_PATH: &str = "./faces-model.onnx";
pub const DEFAULT_SNAPSHOT_PATH: &str = "./stillframe.jpg";
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

/// Square capture resolution; the face model expects 224x224 input.
pub const MODEL_INPUT_SIZE: u32 = 224;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.4;
pub const DEFAULT_TOP_K: usize = 1;

/// Pause between recognition cycles.
pub const DEFAULT_LOOP_DELAY: Duration = Duration::from_secs(5);

/// Exposure / white balance warm-up after the camera stream starts.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Name used when nobody is recognized with enough confidence.
pub const FALLBACK_PERSON_NAME: &str = "friend";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
