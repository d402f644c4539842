use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::capture::domain::frame_source::FrameSource;
use crate::classification::domain::classifier::{ClassifyError, Classifier};
use crate::notification::domain::notifier::Notifier;
use crate::notification::domain::uploader::Uploader;
use crate::recognition::cycle_logger::CycleLogger;
use crate::recognition::domain::label_table::LabelTable;
use crate::recognition::domain::recognition_outcome::{NotifyPolicy, RecognitionOutcome};
use crate::recognition::stop_signal::StopSignal;
use crate::shared::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LOOP_DELAY, DEFAULT_SNAPSHOT_PATH, DEFAULT_TOP_K,
    FALLBACK_PERSON_NAME,
};
use crate::shared::frame::Frame;
use crate::storage::domain::snapshot_writer::SnapshotWriter;

#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionSettings {
    pub confidence_threshold: f32,
    pub top_k: usize,
    pub fallback_name: String,
    pub notify_policy: NotifyPolicy,
    pub snapshot_path: PathBuf,
    pub loop_delay: Duration,
    /// Stop after this many cycles; `None` runs until stopped.
    pub max_cycles: Option<usize>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            fallback_name: FALLBACK_PERSON_NAME.to_string(),
            notify_policy: NotifyPolicy::default(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            loop_delay: DEFAULT_LOOP_DELAY,
            max_cycles: None,
        }
    }
}

/// Stage at which a cycle was given up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleStage {
    Capture,
    Classify,
}

impl fmt::Display for CycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleStage::Capture => write!(f, "capture"),
            CycleStage::Classify => write!(f, "classify"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CycleStatus {
    Completed {
        outcome: RecognitionOutcome,
        tagged_name: String,
        top_score: Option<f32>,
        notified: bool,
        persisted: bool,
        uploaded: bool,
    },
    Abandoned {
        stage: CycleStage,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub cycle: usize,
    pub status: CycleStatus,
}

/// Capture → classify → decide → notify + persist, once per interval.
///
/// Owns the camera and the model exclusively. Nothing that goes wrong inside
/// a cycle escapes it: failures are logged and the next cycle runs on
/// schedule.
pub struct RecognitionLoop {
    source: Box<dyn FrameSource>,
    classifier: Box<dyn Classifier>,
    labels: LabelTable,
    notifier: Box<dyn Notifier>,
    uploader: Box<dyn Uploader>,
    snapshot_writer: Box<dyn SnapshotWriter>,
    logger: Box<dyn CycleLogger>,
    settings: RecognitionSettings,
    cycle: usize,
}

impl RecognitionLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        classifier: Box<dyn Classifier>,
        labels: LabelTable,
        notifier: Box<dyn Notifier>,
        uploader: Box<dyn Uploader>,
        snapshot_writer: Box<dyn SnapshotWriter>,
        logger: Box<dyn CycleLogger>,
        settings: RecognitionSettings,
    ) -> Self {
        Self {
            source,
            classifier,
            labels,
            notifier,
            uploader,
            snapshot_writer,
            logger,
            settings,
            cycle: 0,
        }
    }

    /// Runs cycles until `stop` is requested or `max_cycles` is reached.
    ///
    /// The stop signal is checked before every cycle and interrupts the
    /// pause between cycles. Returns the number of cycles run.
    pub fn run(&mut self, stop: &StopSignal) -> usize {
        let first = self.cycle;
        log::info!(
            "Recognition loop started (threshold {}, every {:?}, {} labels)",
            self.settings.confidence_threshold,
            self.settings.loop_delay,
            self.labels.len()
        );

        while !stop.is_requested() && !self.reached_max_cycles() {
            self.run_cycle();
            if self.reached_max_cycles() || stop.sleep(self.settings.loop_delay) {
                break;
            }
        }

        let ran = self.cycle - first;
        log::info!("Recognition loop stopped after {ran} cycles");
        self.logger.summary();
        ran
    }

    /// Runs exactly one cycle, without the trailing pause.
    pub fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;
        let cycle = self.cycle;

        let started = Instant::now();
        let frame = match self.source.capture() {
            Ok(frame) => frame,
            Err(e) => return self.abandon(cycle, CycleStage::Capture, e.to_string()),
        };
        self.logger.timing("capture", elapsed_ms(started));

        let started = Instant::now();
        let result = match self.classifier.classify(&frame, self.settings.top_k) {
            Ok(result) => result,
            Err(e) => {
                if matches!(e, ClassifyError::ShapeMismatch { .. }) {
                    log::error!(
                        "Cycle {cycle}: {e}; capture resolution does not fit the model, \
                         every cycle will fail until it is reconfigured"
                    );
                }
                return self.abandon(cycle, CycleStage::Classify, e.to_string());
            }
        };
        self.logger.timing("classify", elapsed_ms(started));

        let top = result.top();
        let top_score = top.map(|c| c.score);
        let outcome =
            RecognitionOutcome::decide(top, self.settings.confidence_threshold, &self.labels);
        self.logger.outcome(cycle, &outcome, top_score);
        let tagged_name = outcome
            .tagged_name(&self.settings.fallback_name)
            .to_string();

        let notified =
            self.settings.notify_policy.should_notify(&outcome) && self.notify(&tagged_name);
        let persisted = self.persist(&frame);
        let uploaded = persisted && self.upload(&tagged_name);

        CycleReport {
            cycle,
            status: CycleStatus::Completed {
                outcome,
                tagged_name,
                top_score,
                notified,
                persisted,
                uploaded,
            },
        }
    }

    pub fn cycles_run(&self) -> usize {
        self.cycle
    }

    fn reached_max_cycles(&self) -> bool {
        self.settings
            .max_cycles
            .is_some_and(|max| self.cycle >= max)
    }

    fn abandon(&mut self, cycle: usize, stage: CycleStage, reason: String) -> CycleReport {
        self.logger.abandoned(cycle, &stage.to_string(), &reason);
        CycleReport {
            cycle,
            status: CycleStatus::Abandoned { stage, reason },
        }
    }

    fn notify(&mut self, name: &str) -> bool {
        let started = Instant::now();
        let result = self.notifier.notify(name);
        self.logger.timing("notify", elapsed_ms(started));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cycle {}: {e}", self.cycle);
                false
            }
        }
    }

    fn persist(&mut self, frame: &Frame) -> bool {
        let started = Instant::now();
        let result = self
            .snapshot_writer
            .write(&self.settings.snapshot_path, frame);
        self.logger.timing("persist", elapsed_ms(started));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cycle {}: {e}", self.cycle);
                false
            }
        }
    }

    fn upload(&mut self, tagged_name: &str) -> bool {
        let started = Instant::now();
        let result = self
            .uploader
            .upload(&self.settings.snapshot_path, tagged_name);
        self.logger.timing("upload", elapsed_ms(started));
        match result {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cycle {}: {e}", self.cycle);
                false
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::camera_frame_source::CameraFrameSource;
    use crate::capture::domain::camera_device::CameraDevice;
    use crate::capture::domain::frame_source::CaptureError;
    use crate::classification::domain::inference_engine::{
        InferenceEngine, InputElement, InputSpec, InputTensor, OutputTensor, TensorLayout,
    };
    use crate::classification::domain::quantization::QuantizationParams;
    use crate::classification::model_runner::ModelRunner;
    use crate::notification::domain::notifier::NotifyError;
    use crate::notification::domain::uploader::UploadError;
    use crate::recognition::cycle_logger::NullCycleLogger;
    use crate::storage::domain::snapshot_writer::PersistError;
    use crate::storage::infrastructure::image_snapshot_writer::ImageSnapshotWriter;
    use approx::assert_relative_eq;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    const SIZE: u32 = 4;

    // --- Stubs ---

    #[derive(Default)]
    struct CameraLog {
        active: bool,
        stops: usize,
        reads: usize,
    }

    /// Camera whose read fails on the listed (1-based) reads.
    struct FlakyCamera {
        log: Arc<Mutex<CameraLog>>,
        failing_reads: Vec<usize>,
        width: u32,
    }

    impl CameraDevice for FlakyCamera {
        fn start(&mut self) -> Result<(), CaptureError> {
            self.log.lock().unwrap().active = true;
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            let mut log = self.log.lock().unwrap();
            log.reads += 1;
            if self.failing_reads.contains(&log.reads) {
                return Err(CaptureError::Read("sensor timeout".into()));
            }
            let len = (self.width * SIZE * 3) as usize;
            Ok(Frame::new(vec![90u8; len], self.width, SIZE, 3, 0))
        }

        fn stop(&mut self) {
            let mut log = self.log.lock().unwrap();
            log.active = false;
            log.stops += 1;
        }
    }

    struct FakeEngine {
        output: OutputTensor,
    }

    impl InferenceEngine for FakeEngine {
        fn input_spec(&self) -> InputSpec {
            InputSpec {
                layout: TensorLayout::Nhwc,
                height: SIZE,
                width: SIZE,
                channels: 3,
                element: InputElement::U8,
            }
        }

        fn invoke(
            &mut self,
            _input: InputTensor,
        ) -> Result<OutputTensor, Box<dyn std::error::Error>> {
            Ok(self.output.clone())
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        notified: Arc<Mutex<Vec<String>>>,
        uploaded: Arc<Mutex<Vec<(PathBuf, String)>>>,
        written: Arc<Mutex<Vec<PathBuf>>>,
    }

    struct RecordingNotifier {
        recorder: Recorder,
        fail: bool,
        stop_after_notify: Option<StopSignal>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, person: &str) -> Result<(), NotifyError> {
            self.recorder.notified.lock().unwrap().push(person.to_string());
            if let Some(stop) = &self.stop_after_notify {
                stop.request_stop();
            }
            if self.fail {
                return Err(NotifyError {
                    person: person.to_string(),
                    reason: "mirror offline".into(),
                });
            }
            Ok(())
        }
    }

    struct RecordingUploader {
        recorder: Recorder,
        fail: bool,
    }

    impl Uploader for RecordingUploader {
        fn upload(&self, image_path: &Path, tagged_name: &str) -> Result<(), UploadError> {
            self.recorder
                .uploaded
                .lock()
                .unwrap()
                .push((image_path.to_path_buf(), tagged_name.to_string()));
            if self.fail {
                return Err(UploadError::Transport {
                    path: image_path.to_path_buf(),
                    reason: "bucket unavailable".into(),
                });
            }
            Ok(())
        }
    }

    struct RecordingWriter {
        recorder: Recorder,
        fail: bool,
    }

    impl SnapshotWriter for RecordingWriter {
        fn write(&self, path: &Path, _frame: &Frame) -> Result<(), PersistError> {
            if self.fail {
                return Err(PersistError::Encode("disk full".into()));
            }
            self.recorder.written.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    // --- Helpers ---

    struct Harness {
        camera_log: Arc<Mutex<CameraLog>>,
        recorder: Recorder,
        recognition: RecognitionLoop,
    }

    struct HarnessOptions {
        output: OutputTensor,
        failing_reads: Vec<usize>,
        frame_width: u32,
        settings: RecognitionSettings,
        fail_notify: bool,
        fail_upload: bool,
        fail_persist: bool,
        stop_after_notify: Option<StopSignal>,
    }

    impl HarnessOptions {
        fn new(output: OutputTensor) -> Self {
            Self {
                output,
                failing_reads: Vec::new(),
                frame_width: SIZE,
                settings: settings(),
                fail_notify: false,
                fail_upload: false,
                fail_persist: false,
                stop_after_notify: None,
            }
        }

        fn build(self) -> Harness {
            let camera_log = Arc::new(Mutex::new(CameraLog::default()));
            let recorder = Recorder::default();
            let camera = FlakyCamera {
                log: camera_log.clone(),
                failing_reads: self.failing_reads,
                width: self.frame_width,
            };
            let recognition = RecognitionLoop::new(
                Box::new(CameraFrameSource::new(Box::new(camera), Duration::ZERO)),
                Box::new(ModelRunner::new(Box::new(FakeEngine {
                    output: self.output,
                }))),
                LabelTable::from_lines(["Alice", "Bob"]),
                Box::new(RecordingNotifier {
                    recorder: recorder.clone(),
                    fail: self.fail_notify,
                    stop_after_notify: self.stop_after_notify,
                }),
                Box::new(RecordingUploader {
                    recorder: recorder.clone(),
                    fail: self.fail_upload,
                }),
                Box::new(RecordingWriter {
                    recorder: recorder.clone(),
                    fail: self.fail_persist,
                }),
                Box::new(NullCycleLogger),
                self.settings,
            );
            Harness {
                camera_log,
                recorder,
                recognition,
            }
        }
    }

    fn settings() -> RecognitionSettings {
        RecognitionSettings {
            snapshot_path: PathBuf::from("/tmp/mirror-monitor-test/stillframe.jpg"),
            loop_delay: Duration::ZERO,
            ..RecognitionSettings::default()
        }
    }

    fn float(scores: &[f32]) -> OutputTensor {
        OutputTensor::Float(scores.to_vec())
    }

    fn notified(h: &Harness) -> Vec<String> {
        h.recorder.notified.lock().unwrap().clone()
    }

    fn uploaded_names(h: &Harness) -> Vec<String> {
        h.recorder
            .uploaded
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }

    // --- End-to-end scenarios ---

    #[test]
    fn test_confident_match_notifies_and_tags_snapshot() {
        let mut h = HarnessOptions::new(float(&[0.1, 0.9])).build();

        let report = h.recognition.run_cycle();

        assert_eq!(report.cycle, 1);
        match report.status {
            CycleStatus::Completed {
                outcome,
                tagged_name,
                top_score,
                notified,
                persisted,
                uploaded,
            } => {
                assert_eq!(outcome, RecognitionOutcome::Identified("Bob".into()));
                assert_eq!(tagged_name, "Bob");
                assert_relative_eq!(top_score.unwrap(), 0.9);
                assert!(notified && persisted && uploaded);
            }
            other => panic!("unexpected status: {other:?}"),
        }
        assert_eq!(notified(&h), vec!["Bob"]);
        assert_eq!(uploaded_names(&h), vec!["Bob"]);
        let uploads = h.recorder.uploaded.lock().unwrap();
        assert_eq!(uploads[0].0, settings().snapshot_path);
    }

    #[test]
    fn test_low_confidence_persists_with_fallback_without_notifying() {
        let mut h = HarnessOptions::new(float(&[0.3, 0.35])).build();

        let report = h.recognition.run_cycle();

        assert!(matches!(
            report.status,
            CycleStatus::Completed {
                outcome: RecognitionOutcome::Unknown,
                notified: false,
                persisted: true,
                ..
            }
        ));
        assert!(notified(&h).is_empty());
        assert_eq!(uploaded_names(&h), vec!["friend"]);
        assert_eq!(h.recorder.written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_nan_score_is_never_identified() {
        let mut h = HarnessOptions::new(float(&[0.1, f32::NAN, 0.2])).build();

        let report = h.recognition.run_cycle();

        let CycleStatus::Completed {
            outcome, top_score, ..
        } = report.status
        else {
            panic!("cycle should complete");
        };
        assert_eq!(outcome, RecognitionOutcome::Unknown);
        assert_relative_eq!(top_score.unwrap(), 0.2);
        assert!(notified(&h).is_empty());
        assert_eq!(uploaded_names(&h), vec!["friend"]);
    }

    #[test]
    fn test_quantized_output_is_dequantized_before_threshold() {
        let mut h = HarnessOptions::new(OutputTensor::Quantized {
            values: vec![10, 250],
            quantization: QuantizationParams::new(0.0039, 0),
        })
        .build();

        let report = h.recognition.run_cycle();

        let CycleStatus::Completed {
            outcome, top_score, ..
        } = report.status
        else {
            panic!("cycle should complete");
        };
        assert_eq!(outcome, RecognitionOutcome::Identified("Bob".into()));
        assert_relative_eq!(top_score.unwrap(), 0.975, epsilon = 1e-5);
        assert_eq!(notified(&h), vec!["Bob"]);
    }

    #[test]
    fn test_capture_failure_on_cycle_three_of_five() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.failing_reads = vec![3];
        options.settings.max_cycles = Some(5);
        let mut h = options.build();

        let ran = h.recognition.run(&StopSignal::new());

        assert_eq!(ran, 5);
        assert_eq!(notified(&h).len(), 4);
        assert_eq!(uploaded_names(&h).len(), 4);
        assert_eq!(h.recorder.written.lock().unwrap().len(), 4);
        let log = h.camera_log.lock().unwrap();
        assert_eq!(log.reads, 5);
        assert_eq!(log.stops, 5);
        assert!(!log.active);
    }

    // --- Resilience ---

    #[test]
    fn test_capture_failure_report() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.failing_reads = vec![1];
        let mut h = options.build();

        let first = h.recognition.run_cycle();
        let second = h.recognition.run_cycle();

        assert!(matches!(
            first.status,
            CycleStatus::Abandoned {
                stage: CycleStage::Capture,
                ..
            }
        ));
        assert!(matches!(second.status, CycleStatus::Completed { .. }));
        assert!(!h.camera_log.lock().unwrap().active);
    }

    #[test]
    fn test_shape_mismatch_abandons_every_cycle_but_loop_keeps_going() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.frame_width = SIZE * 2;
        options.settings.max_cycles = Some(3);
        let mut h = options.build();

        assert_eq!(h.recognition.run(&StopSignal::new()), 3);
        assert!(notified(&h).is_empty());
        assert!(uploaded_names(&h).is_empty());
        let log = h.camera_log.lock().unwrap();
        assert_eq!(log.stops, 3);
        assert!(!log.active);
    }

    #[test]
    fn test_shape_mismatch_report_names_classify_stage() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.frame_width = SIZE * 2;
        let mut h = options.build();

        let report = h.recognition.run_cycle();
        let CycleStatus::Abandoned { stage, reason } = report.status else {
            panic!("cycle should be abandoned");
        };
        assert_eq!(stage, CycleStage::Classify);
        assert!(reason.contains("does not match model input"));
    }

    #[test]
    fn test_notify_failure_does_not_block_persistence() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.fail_notify = true;
        let mut h = options.build();

        let report = h.recognition.run_cycle();
        assert!(matches!(
            report.status,
            CycleStatus::Completed {
                notified: false,
                persisted: true,
                uploaded: true,
                ..
            }
        ));
    }

    #[test]
    fn test_persist_failure_skips_upload() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.fail_persist = true;
        let mut h = options.build();

        let report = h.recognition.run_cycle();
        assert!(matches!(
            report.status,
            CycleStatus::Completed {
                notified: true,
                persisted: false,
                uploaded: false,
                ..
            }
        ));
        assert!(uploaded_names(&h).is_empty());
    }

    #[test]
    fn test_upload_failure_is_reported_not_fatal() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.fail_upload = true;
        options.settings.max_cycles = Some(2);
        let mut h = options.build();

        assert_eq!(h.recognition.run(&StopSignal::new()), 2);
        assert_eq!(uploaded_names(&h).len(), 2);
    }

    // --- Policy and control ---

    #[test]
    fn test_every_cycle_policy_notifies_fallback_name() {
        let mut options = HarnessOptions::new(float(&[0.3, 0.35]));
        options.settings.notify_policy = NotifyPolicy::EveryCycle;
        let mut h = options.build();

        h.recognition.run_cycle();
        assert_eq!(notified(&h), vec!["friend"]);
    }

    #[test]
    fn test_custom_fallback_name() {
        let mut options = HarnessOptions::new(float(&[0.3, 0.35]));
        options.settings.fallback_name = "guest".into();
        let mut h = options.build();

        h.recognition.run_cycle();
        assert_eq!(uploaded_names(&h), vec!["guest"]);
    }

    #[test]
    fn test_top_k_above_one_still_decides_on_best() {
        let mut options = HarnessOptions::new(float(&[0.45, 0.5]));
        options.settings.top_k = 2;
        let mut h = options.build();

        h.recognition.run_cycle();
        assert_eq!(notified(&h), vec!["Bob"]);
    }

    #[test]
    fn test_stop_requested_before_run_runs_nothing() {
        let mut h = HarnessOptions::new(float(&[0.1, 0.9])).build();
        let stop = StopSignal::new();
        stop.request_stop();

        assert_eq!(h.recognition.run(&stop), 0);
        assert_eq!(h.camera_log.lock().unwrap().reads, 0);
    }

    #[test]
    fn test_stop_during_cycle_ends_loop_after_that_cycle() {
        let stop = StopSignal::new();
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.stop_after_notify = Some(stop.clone());
        options.settings.loop_delay = Duration::from_secs(60);
        let mut h = options.build();

        let started = Instant::now();
        assert_eq!(h.recognition.run(&stop), 1);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(uploaded_names(&h), vec!["Bob"]);
    }

    #[test]
    fn test_cycle_numbers_continue_across_runs() {
        let mut options = HarnessOptions::new(float(&[0.1, 0.9]));
        options.settings.max_cycles = Some(2);
        let mut h = options.build();

        h.recognition.run(&StopSignal::new());
        assert_eq!(h.recognition.cycles_run(), 2);
        assert_eq!(h.recognition.run(&StopSignal::new()), 0);
    }

    #[test]
    fn test_snapshot_written_to_disk_with_real_writer() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("stillframe.png");
        let camera_log = Arc::new(Mutex::new(CameraLog::default()));
        let recorder = Recorder::default();
        let mut recognition = RecognitionLoop::new(
            Box::new(CameraFrameSource::new(
                Box::new(FlakyCamera {
                    log: camera_log,
                    failing_reads: Vec::new(),
                    width: SIZE,
                }),
                Duration::ZERO,
            )),
            Box::new(ModelRunner::new(Box::new(FakeEngine {
                output: float(&[0.8, 0.2]),
            }))),
            LabelTable::from_lines(["Alice", "Bob"]),
            Box::new(RecordingNotifier {
                recorder: recorder.clone(),
                fail: false,
                stop_after_notify: None,
            }),
            Box::new(RecordingUploader {
                recorder: recorder.clone(),
                fail: false,
            }),
            Box::new(ImageSnapshotWriter::new()),
            Box::new(NullCycleLogger),
            RecognitionSettings {
                snapshot_path: snapshot.clone(),
                loop_delay: Duration::ZERO,
                ..RecognitionSettings::default()
            },
        );

        recognition.run_cycle();

        let img = image::open(&snapshot).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (SIZE, SIZE));
        assert_eq!(img.get_pixel(0, 0).0, [90, 90, 90]);
        let uploads = recorder.uploaded.lock().unwrap();
        assert_eq!(uploads[0], (snapshot, "Alice".to_string()));
    }
}
