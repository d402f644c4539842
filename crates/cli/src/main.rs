use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;

use mirror_monitor_core::capture::camera_frame_source::CameraFrameSource;
use mirror_monitor_core::capture::domain::camera_device::CameraDevice;
use mirror_monitor_core::capture::infrastructure::ffmpeg_camera::FfmpegCamera;
use mirror_monitor_core::capture::infrastructure::image_file_camera::ImageFileCamera;
use mirror_monitor_core::classification::domain::quantization::QuantizationParams;
use mirror_monitor_core::classification::infrastructure::onnx_engine::OnnxEngine;
use mirror_monitor_core::classification::model_runner::ModelRunner;
use mirror_monitor_core::notification::domain::notifier::Notifier;
use mirror_monitor_core::notification::domain::uploader::Uploader;
use mirror_monitor_core::notification::infrastructure::http_mirror_notifier::HttpMirrorNotifier;
use mirror_monitor_core::notification::infrastructure::http_uploader::HttpUploader;
use mirror_monitor_core::notification::infrastructure::logging_sinks::{
    LoggingNotifier, LoggingUploader,
};
use mirror_monitor_core::recognition::cycle_logger::StatsCycleLogger;
use mirror_monitor_core::recognition::domain::label_table::{ConfigError, LabelTable};
use mirror_monitor_core::recognition::domain::recognition_outcome::NotifyPolicy;
use mirror_monitor_core::recognition::recognition_loop::{RecognitionLoop, RecognitionSettings};
use mirror_monitor_core::recognition::stop_signal::StopSignal;
use mirror_monitor_core::shared::constants::{
    DEFAULT_CAMERA_DEVICE, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_LABELS_PATH, DEFAULT_LOOP_DELAY, DEFAULT_MODEL_PATH, DEFAULT_SETTLE_DELAY,
    DEFAULT_SNAPSHOT_PATH, DEFAULT_TOP_K, FALLBACK_PERSON_NAME, IMAGE_EXTENSIONS,
    MODEL_INPUT_SIZE,
};
use mirror_monitor_core::storage::infrastructure::image_snapshot_writer::ImageSnapshotWriter;

/// Watches a camera, recognizes who stands in front of the mirror and tells
/// the mirror display about it.
#[derive(Parser, Debug)]
#[command(name = "mirror-monitor")]
struct Cli {
    /// Label file, one person name per line (line number = class index).
    #[arg(long, default_value = DEFAULT_LABELS_PATH)]
    labels: PathBuf,

    /// ONNX image-classification model.
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Where the latest captured frame is written each cycle.
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,

    /// Camera device to capture from.
    #[arg(long, default_value = DEFAULT_CAMERA_DEVICE)]
    camera_device: String,

    /// Capture from this still image instead of the camera.
    #[arg(long)]
    replay_image: Option<PathBuf>,

    /// Capture resolution (square, pixels). Must match the model input.
    #[arg(long, default_value_t = MODEL_INPUT_SIZE)]
    resolution: u32,

    /// Minimum score for a match to count (inclusive). Compared against
    /// probabilities or raw logits, whatever the model outputs.
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    confidence: f32,

    /// Number of ranked classes to compute per frame.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Pause between cycles, in seconds.
    #[arg(long, default_value_t = DEFAULT_LOOP_DELAY.as_secs_f64())]
    loop_delay_secs: f64,

    /// Camera warm-up before each frame, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_SETTLE_DELAY.as_millis() as u64)]
    settle_delay_ms: u64,

    /// Name used for snapshots when nobody is recognized.
    #[arg(long, default_value = FALLBACK_PERSON_NAME)]
    fallback_name: String,

    /// When to notify the mirror: identified or always.
    #[arg(long, default_value_t = NotifyPolicy::IdentifiedOnly)]
    notify_policy: NotifyPolicy,

    /// Mirror notification endpoint (logs only when unset).
    #[arg(long)]
    mirror_url: Option<String>,

    /// Snapshot upload endpoint (snapshot stays local when unset).
    #[arg(long)]
    upload_url: Option<String>,

    /// Dequantization scale for a u8 model output.
    #[arg(long)]
    output_scale: Option<f32>,

    /// Dequantization zero point for a u8 model output (0-255).
    #[arg(long, requires = "output_scale")]
    output_zero_point: Option<i32>,

    /// Intra-op threads for inference.
    #[arg(long, default_value = "2")]
    threads: usize,

    /// Stop after this many cycles (runs until "q" on stdin otherwise).
    #[arg(long)]
    max_cycles: Option<usize>,

    /// Timeout for each mirror request, in seconds.
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs())]
    http_timeout_secs: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let labels = load_labels(&cli.labels)?;

    let quantization = cli
        .output_scale
        .map(|scale| QuantizationParams::new(scale, cli.output_zero_point.unwrap_or(0)));
    let engine = OnnxEngine::load(&cli.model, quantization, cli.threads)?;
    let classifier = ModelRunner::new(Box::new(engine));

    let device = build_camera(&cli);
    let source = CameraFrameSource::new(device, Duration::from_millis(cli.settle_delay_ms));

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(cli.http_timeout_secs))
        .build()?;
    let notifier: Box<dyn Notifier> = match &cli.mirror_url {
        Some(url) => Box::new(HttpMirrorNotifier::new(client.clone(), url.clone())),
        None => Box::new(LoggingNotifier),
    };
    let uploader: Box<dyn Uploader> = match &cli.upload_url {
        Some(url) => Box::new(HttpUploader::new(client, url.clone())),
        None => Box::new(LoggingUploader),
    };

    let settings = RecognitionSettings {
        confidence_threshold: cli.confidence,
        top_k: cli.top_k,
        fallback_name: cli.fallback_name.clone(),
        notify_policy: cli.notify_policy,
        snapshot_path: cli.snapshot.clone(),
        loop_delay: Duration::from_secs_f64(cli.loop_delay_secs),
        max_cycles: cli.max_cycles,
    };

    let mut recognition = RecognitionLoop::new(
        Box::new(source),
        Box::new(classifier),
        labels,
        notifier,
        uploader,
        Box::new(ImageSnapshotWriter::new()),
        Box::new(StatsCycleLogger::new()),
        settings,
    );

    let stop = StopSignal::new();
    watch_stdin(stop.clone());
    log::info!("Type \"q\" and Enter to stop");
    recognition.run(&stop);
    Ok(())
}

fn load_labels(path: &Path) -> Result<LabelTable, ConfigError> {
    let labels = LabelTable::load(path)?;
    if labels.is_empty() {
        log::warn!(
            "Label file {} has no entries; every cycle will use the fallback name",
            path.display()
        );
    } else {
        log::info!("Loaded {} labels from {}", labels.len(), path.display());
    }
    Ok(labels)
}

fn build_camera(cli: &Cli) -> Box<dyn CameraDevice> {
    match &cli.replay_image {
        Some(path) => {
            log::info!("Replaying still image {}", path.display());
            Box::new(ImageFileCamera::new(path, cli.resolution, cli.resolution))
        }
        None => Box::new(FfmpegCamera::new(
            cli.camera_device.clone(),
            cli.resolution,
            cli.resolution,
        )),
    }
}

/// Requests a stop when "q" or "quit" is read from stdin. End of input is
/// ignored so the loop keeps running when started without a terminal.
fn watch_stdin(stop: StopSignal) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if matches!(line.trim(), "q" | "quit") {
                log::info!("Stop requested, finishing current cycle");
                stop.request_stop();
                break;
            }
        }
    });
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.labels.is_file() {
        return Err(format!("Label file not found: {}", cli.labels.display()).into());
    }
    if !cli.model.is_file() {
        return Err(format!("Model file not found: {}", cli.model.display()).into());
    }
    check_settings(cli)
}

/// Checks every value that does not touch the filesystem.
fn check_settings(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.replay_image {
        if !is_image(path) {
            return Err(
                format!("Replay image must be an image file, got {}", path.display()).into(),
            );
        }
    }
    if !cli.confidence.is_finite() {
        return Err(format!("Confidence must be a finite number, got {}", cli.confidence).into());
    }
    if cli.top_k == 0 {
        return Err("Top-k must be at least 1".into());
    }
    if cli.resolution == 0 {
        return Err("Resolution must be positive".into());
    }
    if !cli.loop_delay_secs.is_finite() || cli.loop_delay_secs < 0.0 {
        return Err(format!(
            "Loop delay must be a non-negative number of seconds, got {}",
            cli.loop_delay_secs
        )
        .into());
    }
    if cli.fallback_name.trim().is_empty() {
        return Err("Fallback name must not be empty".into());
    }
    if let Some(scale) = cli.output_scale {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(format!("Output scale must be a positive number, got {scale}").into());
        }
    }
    if let Some(zero_point) = cli.output_zero_point {
        if !(0..=255).contains(&zero_point) {
            return Err(
                format!("Output zero point must be between 0 and 255, got {zero_point}").into(),
            );
        }
    }
    if cli.threads == 0 {
        return Err("Threads must be at least 1".into());
    }
    if cli.max_cycles == Some(0) {
        return Err("Max cycles must be at least 1".into());
    }
    if cli.http_timeout_secs == 0 {
        return Err("HTTP timeout must be at least 1 second".into());
    }
    for url in [&cli.mirror_url, &cli.upload_url].into_iter().flatten() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("URL must start with http:// or https://, got '{url}'").into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["mirror-monitor"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.labels, PathBuf::from("./faces-labels.txt"));
        assert_eq!(cli.model, PathBuf::from("./faces-model.onnx"));
        assert_eq!(cli.snapshot, PathBuf::from("./stillframe.jpg"));
        assert_eq!(cli.camera_device, "/dev/video0");
        assert_eq!(cli.resolution, 224);
        assert_eq!(cli.top_k, 1);
        assert_eq!(cli.settle_delay_ms, 1000);
        assert_eq!(cli.loop_delay_secs, 5.0);
        assert_eq!(cli.fallback_name, "friend");
        assert_eq!(cli.notify_policy, NotifyPolicy::IdentifiedOnly);
        assert!(cli.mirror_url.is_none());
        assert!(check_settings(&cli).is_ok());
    }

    #[test]
    fn test_notify_policy_flag() {
        let cli = parse(&["--notify-policy", "always"]);
        assert_eq!(cli.notify_policy, NotifyPolicy::EveryCycle);
        assert!(Cli::try_parse_from(["mirror-monitor", "--notify-policy", "never"]).is_err());
    }

    #[test]
    fn test_confidence_above_one_is_allowed_for_logits() {
        let cli = parse(&["--confidence", "4.5"]);
        assert!(check_settings(&cli).is_ok());
    }

    #[test]
    fn test_empty_label_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faces-labels.txt");
        std::fs::write(&path, "").unwrap();

        let labels = load_labels(&path).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn test_unreadable_label_file_is_config_error() {
        let err = load_labels(Path::new("/nonexistent/labels.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::LabelFile { .. }));
    }

    #[test]
    fn test_zero_point_requires_scale() {
        assert!(Cli::try_parse_from(["mirror-monitor", "--output-zero-point", "3"]).is_err());
        let cli = parse(&["--output-scale", "0.0039", "--output-zero-point", "3"]);
        assert!(check_settings(&cli).is_ok());
    }

    #[rstest]
    #[case::confidence_nan(&["--confidence", "NaN"])]
    #[case::confidence_infinite(&["--confidence", "inf"])]
    #[case::zero_top_k(&["--top-k", "0"])]
    #[case::zero_resolution(&["--resolution", "0"])]
    #[case::negative_delay(&["--loop-delay-secs=-1"])]
    #[case::blank_fallback(&["--fallback-name", "  "])]
    #[case::zero_scale(&["--output-scale", "0"])]
    #[case::zero_point_out_of_range(&["--output-scale", "0.1", "--output-zero-point", "300"])]
    #[case::zero_threads(&["--threads", "0"])]
    #[case::zero_max_cycles(&["--max-cycles", "0"])]
    #[case::bad_mirror_url(&["--mirror-url", "mirror.local/notify"])]
    #[case::bad_upload_url(&["--upload-url", "ftp://bucket"])]
    #[case::replay_not_image(&["--replay-image", "clip.mp4"])]
    fn test_rejected_settings(#[case] args: &[&str]) {
        let cli = parse(args);
        assert!(check_settings(&cli).is_err());
    }

    #[test]
    fn test_validate_reports_missing_label_file() {
        let cli = parse(&["--labels", "/nonexistent/labels.txt"]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Label file not found"));
    }
}
