use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::enhancement::domain::frame_enhancer::FrameEnhancer;
use crate::output::domain::artifact_namer::ArtifactNamer;
use crate::output::domain::image_writer::ImageWriter;
use crate::shared::constants::FPS_REPORT_INTERVAL;
use crate::shared::frame::Frame;
use crate::shared::source_descriptor::SourceDescriptor;

use super::pipeline_error::PipelineError;
use super::pipeline_logger::{FrameRecord, PipelineLogger};
use super::region_filter::filter_regions;
use super::save_policy::{SavePolicy, SaveTracker};

/// Run-level knobs for the capture loop.
#[derive(Clone, Debug)]
pub struct CaptureLoopSettings {
    pub save_policy: SavePolicy,
    pub output_dir: PathBuf,
    /// Stop after this many frames; 0 runs until the stream ends or the
    /// stop flag is raised.
    pub max_frames: u64,
    /// Regions smaller than this on either side are discarded.
    pub min_face_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    MaxFrames,
    Interrupted,
}

/// Outcome of a loop that stopped cleanly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub saved: u64,
    pub stop_reason: StopReason,
}

/// Reads, enhances, detects, annotates and periodically saves frames
/// until the stream ends, `max_frames` is reached or the stop flag is set.
///
/// Everything runs on the calling thread. Each processed frame yields
/// exactly one [`FrameRecord`], and loop state lives in this call only.
pub struct CaptureLoopUseCase {
    source: Box<dyn FrameSource>,
    enhancer: Box<dyn FrameEnhancer>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
    settings: CaptureLoopSettings,
    stop: Arc<AtomicBool>,
}

impl CaptureLoopUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        enhancer: Box<dyn FrameEnhancer>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        writer: Box<dyn ImageWriter>,
        logger: Box<dyn PipelineLogger>,
        settings: CaptureLoopSettings,
    ) -> Self {
        Self {
            source,
            enhancer,
            detector,
            annotator,
            writer,
            logger,
            settings,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares a flag that, once set, ends the loop before the next read.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn execute(&mut self, source: &SourceDescriptor) -> Result<RunSummary, PipelineError> {
        let output_dir = self.settings.output_dir.clone();
        fs::create_dir_all(&output_dir).map_err(|e| PipelineError::Directory {
            path: output_dir.clone(),
            source: e,
        })?;

        let metadata = self
            .source
            .open(source)
            .map_err(|cause| PipelineError::SourceUnavailable {
                uri: source.redacted(),
                cause,
            })?;
        self.logger.info(&format!(
            "Connected to source {} ({}x{} {} @ {:.2} fps)",
            metadata.source, metadata.width, metadata.height, metadata.codec, metadata.fps
        ));
        self.logger.info(&format!(
            "Saving annotated frames {} to {}",
            self.settings.save_policy,
            output_dir.display()
        ));

        let result = self.run_loop(ArtifactNamer::new(output_dir));
        self.source.close();
        self.logger.summary();
        result
    }

    fn run_loop(&mut self, mut namer: ArtifactNamer) -> Result<RunSummary, PipelineError> {
        let mut tracker = SaveTracker::new(self.settings.save_policy.clone());
        let mut fps = FpsMeter::new(Instant::now());
        let mut frames: u64 = 0;
        let mut saved: u64 = 0;

        loop {
            if self.stop.load(Ordering::Relaxed) {
                self.logger.info("Interrupted by user");
                return Ok(RunSummary {
                    frames,
                    saved,
                    stop_reason: StopReason::Interrupted,
                });
            }

            let mut frame = match self.source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return Err(PipelineError::EndOfStream { frames }),
                // A signal during a blocking read surfaces as an I/O error.
                Err(_) if self.stop.load(Ordering::Relaxed) => {
                    self.logger.info("Interrupted by user");
                    return Ok(RunSummary {
                        frames,
                        saved,
                        stop_reason: StopReason::Interrupted,
                    });
                }
                Err(cause) => {
                    return Err(PipelineError::FrameRead {
                        frame: frames + 1,
                        cause,
                    })
                }
            };

            let (faces, infer_ms) = self.process(&mut frame, frames + 1)?;
            frames += 1;

            if tracker.tick(Instant::now()) {
                let path = namer.next_path(Utc::now());
                self.writer
                    .write(&path, &frame)
                    .map_err(|cause| PipelineError::Write {
                        path: path.clone(),
                        cause,
                    })?;
                saved += 1;
                self.logger.saved(&path, saved);
            }

            self.logger.frame(&FrameRecord {
                frame: frames,
                faces,
                infer_ms,
            });

            if let Some(rate) = fps.tick(Instant::now()) {
                self.logger.throughput(rate);
            }

            if self.settings.max_frames > 0 && frames >= self.settings.max_frames {
                self.logger
                    .info(&format!("Reached max frames ({})", self.settings.max_frames));
                return Ok(RunSummary {
                    frames,
                    saved,
                    stop_reason: StopReason::MaxFrames,
                });
            }
        }
    }

    /// Enhances, detects and annotates in place. Returns the face count and
    /// the enhancement plus detection time in milliseconds.
    fn process(&mut self, frame: &mut Frame, number: u64) -> Result<(usize, f64), PipelineError> {
        let stage_err = |stage: &'static str| {
            move |cause: Box<dyn std::error::Error>| PipelineError::Processing {
                stage,
                frame: number,
                cause,
            }
        };

        let started = Instant::now();
        self.enhancer.enhance(frame).map_err(stage_err("enhance"))?;
        let regions = self.detector.detect(frame).map_err(stage_err("detect"))?;
        let infer_ms = started.elapsed().as_secs_f64() * 1000.0;

        let (width, height) = (frame.width(), frame.height());
        let regions: Vec<_> = regions
            .iter()
            .filter_map(|r| r.clamp_to(width, height))
            .collect();
        let regions = filter_regions(&regions, self.settings.min_face_size);
        self.annotator
            .annotate(frame, &regions)
            .map_err(stage_err("annotate"))?;
        Ok((regions.len(), infer_ms))
    }
}

/// Frames-per-second over fixed wall-clock windows.
struct FpsMeter {
    window_start: Instant,
    frames: u64,
}

impl FpsMeter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Counts a frame; returns the rate once a full window has elapsed.
    fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_REPORT_INTERVAL {
            return None;
        }
        let rate = self.frames as f64 / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames = 0;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::infrastructure::box_outline_annotator::BoxOutlineAnnotator;
    use crate::enhancement::domain::frame_enhancer::IdentityEnhancer;
    use crate::shared::constants::BOX_COLOR;
    use crate::shared::region::Region;
    use crate::shared::stream_metadata::StreamMetadata;
    use approx::assert_relative_eq;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    // --- Stubs ---

    enum Step {
        Frame,
        Fail,
        /// Raises the stop flag, then fails the read like an interrupted syscall.
        Interrupt(Arc<AtomicBool>),
    }

    struct StubSource {
        steps: VecDeque<Step>,
        fail_open: bool,
        next_index: usize,
        closed: Arc<Mutex<bool>>,
    }

    impl StubSource {
        fn frames(count: usize) -> Self {
            Self {
                steps: (0..count).map(|_| Step::Frame).collect(),
                fail_open: false,
                next_index: 0,
                closed: Arc::new(Mutex::new(false)),
            }
        }

        fn unavailable() -> Self {
            Self {
                fail_open: true,
                ..Self::frames(0)
            }
        }
    }

    impl FrameSource for StubSource {
        fn open(
            &mut self,
            source: &SourceDescriptor,
        ) -> Result<StreamMetadata, Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("connection refused".into());
            }
            Ok(StreamMetadata {
                width: 64,
                height: 48,
                fps: 25.0,
                codec: "stub".to_string(),
                source: source.redacted(),
            })
        }

        fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            match self.steps.pop_front() {
                Some(Step::Frame) => {
                    let frame = Frame::filled(64, 48, [10, 10, 10], self.next_index);
                    self.next_index += 1;
                    Ok(Some(frame))
                }
                Some(Step::Fail) => Err("decode error".into()),
                Some(Step::Interrupt(stop)) => {
                    stop.store(true, Ordering::Relaxed);
                    Err("Interrupted system call".into())
                }
                None => Ok(None),
            }
        }

        fn close(&mut self) {
            *self.closed.lock().unwrap() = true;
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
        fail_on: Option<usize>,
        calls: Arc<Mutex<usize>>,
    }

    impl StubDetector {
        fn returning(regions: Vec<Region>) -> Self {
            Self {
                regions,
                fail_on: None,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            *self.calls.lock().unwrap() += 1;
            if self.fail_on == Some(frame.index()) {
                return Err("inference failed".into());
            }
            Ok(self.regions.clone())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingWriter {
        written: Arc<Mutex<Vec<(PathBuf, Frame)>>>,
        fail: bool,
    }

    impl ImageWriter for RecordingWriter {
        fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail {
                return Err("disk full".into());
            }
            self.written
                .lock()
                .unwrap()
                .push((path.to_path_buf(), frame.clone()));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingLogger {
        records: Arc<Mutex<Vec<FrameRecord>>>,
        saved: Arc<Mutex<Vec<u64>>>,
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl PipelineLogger for RecordingLogger {
        fn frame(&mut self, record: &FrameRecord) {
            self.records.lock().unwrap().push(record.clone());
        }

        fn saved(&mut self, _path: &Path, total: u64) {
            self.saved.lock().unwrap().push(total);
        }

        fn throughput(&mut self, _fps: f64) {}

        fn info(&mut self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    // --- Helpers ---

    fn settings(dir: &Path, every: u64, max_frames: u64) -> CaptureLoopSettings {
        CaptureLoopSettings {
            save_policy: SavePolicy::every_frames(every).unwrap(),
            output_dir: dir.to_path_buf(),
            max_frames,
            min_face_size: 0,
        }
    }

    fn use_case(
        source: StubSource,
        detector: StubDetector,
        writer: RecordingWriter,
        logger: RecordingLogger,
        settings: CaptureLoopSettings,
    ) -> CaptureLoopUseCase {
        CaptureLoopUseCase::new(
            Box::new(source),
            Box::new(IdentityEnhancer),
            Box::new(detector),
            Box::new(BoxOutlineAnnotator::default()),
            Box::new(writer),
            Box::new(logger),
            settings,
        )
    }

    fn webcam() -> SourceDescriptor {
        SourceDescriptor::Device(0)
    }

    // --- Tests ---

    #[test]
    fn test_saves_every_nth_frame() {
        let tmp = TempDir::new().unwrap();
        let writer = RecordingWriter::default();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            StubSource::frames(20),
            StubDetector::returning(vec![]),
            writer.clone(),
            logger.clone(),
            settings(tmp.path(), 5, 17),
        );

        let summary = uc.execute(&webcam()).unwrap();

        assert_eq!(summary.frames, 17);
        assert_eq!(summary.saved, 3);
        assert_eq!(summary.stop_reason, StopReason::MaxFrames);
        let written = writer.written.lock().unwrap();
        let saved_indices: Vec<usize> = written.iter().map(|(_, f)| f.index()).collect();
        // Source indices are 0-based; saves land on the 5th, 10th and 15th frame.
        assert_eq!(saved_indices, vec![4, 9, 14]);
        assert_eq!(*logger.saved.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_one_record_per_frame_with_increasing_index() {
        let tmp = TempDir::new().unwrap();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            StubSource::frames(8),
            StubDetector::returning(vec![Region::new(5, 5, 20, 20, 0.9)]),
            RecordingWriter::default(),
            logger.clone(),
            settings(tmp.path(), 3, 8),
        );

        uc.execute(&webcam()).unwrap();

        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 8);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.frame, i as u64 + 1);
            assert_eq!(record.faces, 1);
            assert!(record.infer_ms >= 0.0);
        }
    }

    #[test]
    fn test_saved_artifact_has_one_box_per_counted_face() {
        let tmp = TempDir::new().unwrap();
        let writer = RecordingWriter::default();
        let logger = RecordingLogger::default();
        let regions = vec![
            Region::new(2, 2, 20, 20, 0.9),
            Region::new(30, 10, 20, 20, 0.8),
        ];
        let mut uc = use_case(
            StubSource::frames(1),
            StubDetector::returning(regions.clone()),
            writer.clone(),
            logger.clone(),
            settings(tmp.path(), 1, 1),
        );

        uc.execute(&webcam()).unwrap();

        assert_eq!(logger.records.lock().unwrap()[0].faces, 2);
        let written = writer.written.lock().unwrap();
        let px = written[0].1.as_ndarray();
        for r in &regions {
            let (x, y) = (r.x as usize, r.y as usize);
            assert_eq!([px[[y, x, 0]], px[[y, x, 1]], px[[y, x, 2]]], BOX_COLOR);
        }
        // Background between the two boxes is untouched.
        assert_eq!(px[[40, 25, 1]], 10);
    }

    #[test]
    fn test_small_regions_are_filtered_before_counting() {
        let tmp = TempDir::new().unwrap();
        let logger = RecordingLogger::default();
        let mut s = settings(tmp.path(), 10, 2);
        s.min_face_size = 20;
        let mut uc = use_case(
            StubSource::frames(2),
            StubDetector::returning(vec![
                Region::new(0, 0, 8, 8, 0.9),
                Region::new(10, 10, 24, 24, 0.9),
            ]),
            RecordingWriter::default(),
            logger.clone(),
            s,
        );

        uc.execute(&webcam()).unwrap();

        assert!(logger.records.lock().unwrap().iter().all(|r| r.faces == 1));
    }

    #[test]
    fn test_regions_outside_frame_are_not_counted() {
        let tmp = TempDir::new().unwrap();
        let writer = RecordingWriter::default();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            StubSource::frames(1),
            StubDetector::returning(vec![
                Region::new(100, 100, 20, 20, 0.9),
                Region::new(-30, -30, 20, 20, 0.9),
                Region::new(50, 40, 30, 30, 0.9),
            ]),
            writer.clone(),
            logger.clone(),
            settings(tmp.path(), 1, 1),
        );

        uc.execute(&webcam()).unwrap();

        // Only the box straddling the bottom-right corner survives, clipped to 14x8.
        assert_eq!(logger.records.lock().unwrap()[0].faces, 1);
        let written = writer.written.lock().unwrap();
        let px = written[0].1.as_ndarray();
        assert_eq!([px[[40, 50, 0]], px[[40, 50, 1]], px[[40, 50, 2]]], BOX_COLOR);
    }

    #[test]
    fn test_clipped_region_is_size_filtered_after_clamping() {
        let tmp = TempDir::new().unwrap();
        let logger = RecordingLogger::default();
        let mut s = settings(tmp.path(), 10, 1);
        s.min_face_size = 20;
        let mut uc = use_case(
            StubSource::frames(1),
            StubDetector::returning(vec![Region::new(50, 0, 40, 40, 0.9)]),
            RecordingWriter::default(),
            logger.clone(),
            s,
        );

        uc.execute(&webcam()).unwrap();

        // 40 px wide before clipping, 14 px inside the 64 px frame.
        assert_eq!(logger.records.lock().unwrap()[0].faces, 0);
    }

    #[test]
    fn test_artifacts_land_in_output_dir_with_unique_names() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("output");
        let writer = RecordingWriter::default();
        let mut uc = use_case(
            StubSource::frames(6),
            StubDetector::returning(vec![]),
            writer.clone(),
            RecordingLogger::default(),
            settings(&out, 1, 6),
        );

        uc.execute(&webcam()).unwrap();

        assert!(out.is_dir());
        let written = writer.written.lock().unwrap();
        let mut paths: Vec<&PathBuf> = written.iter().map(|(p, _)| p).collect();
        assert!(paths.iter().all(|p| p.parent() == Some(out.as_path())));
        assert!(paths.iter().all(|p| p
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("frame_")));
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 6);
    }

    #[test]
    fn test_end_of_stream_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let source = StubSource::frames(3);
        let closed = source.closed.clone();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            source,
            StubDetector::returning(vec![]),
            RecordingWriter::default(),
            logger.clone(),
            settings(tmp.path(), 5, 0),
        );

        let err = uc.execute(&webcam()).unwrap_err();

        assert!(matches!(err, PipelineError::EndOfStream { frames: 3 }));
        assert_eq!(err.exit_code(), 5);
        assert_eq!(logger.records.lock().unwrap().len(), 3);
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_read_failure_stops_without_retry() {
        let tmp = TempDir::new().unwrap();
        let mut source = StubSource::frames(2);
        source.steps.push_back(Step::Fail);
        source.steps.push_back(Step::Frame);
        let mut uc = use_case(
            source,
            StubDetector::returning(vec![]),
            RecordingWriter::default(),
            RecordingLogger::default(),
            settings(tmp.path(), 5, 0),
        );

        let err = uc.execute(&webcam()).unwrap_err();

        assert!(matches!(err, PipelineError::FrameRead { frame: 3, .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_unavailable_source_produces_nothing() {
        let tmp = TempDir::new().unwrap();
        let detector = StubDetector::returning(vec![]);
        let calls = detector.calls.clone();
        let writer = RecordingWriter::default();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            StubSource::unavailable(),
            detector,
            writer.clone(),
            logger.clone(),
            settings(tmp.path(), 1, 0),
        );

        let err = uc
            .execute(&"rtsp://user:pw@10.0.0.9/live".parse::<SourceDescriptor>().unwrap())
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("rtsp://***@10.0.0.9/live"));
        assert!(!err.to_string().contains("pw"));
        assert_eq!(*calls.lock().unwrap(), 0);
        assert!(writer.written.lock().unwrap().is_empty());
        assert!(logger.records.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detector_error_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut detector = StubDetector::returning(vec![]);
        detector.fail_on = Some(1);
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            StubSource::frames(5),
            detector,
            RecordingWriter::default(),
            logger.clone(),
            settings(tmp.path(), 5, 0),
        );

        let err = uc.execute(&webcam()).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Processing {
                stage: "detect",
                frame: 2,
                ..
            }
        ));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(logger.records.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let writer = RecordingWriter {
            fail: true,
            ..Default::default()
        };
        let mut uc = use_case(
            StubSource::frames(5),
            StubDetector::returning(vec![]),
            writer,
            RecordingLogger::default(),
            settings(tmp.path(), 2, 0),
        );

        let err = uc.execute(&webcam()).unwrap_err();

        assert!(matches!(err, PipelineError::Write { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_uncreatable_output_dir() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let mut uc = use_case(
            StubSource::frames(5),
            StubDetector::returning(vec![]),
            RecordingWriter::default(),
            RecordingLogger::default(),
            settings(&blocker.join("out"), 1, 0),
        );

        let err = uc.execute(&webcam()).unwrap_err();

        assert!(matches!(err, PipelineError::Directory { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_stop_flag_ends_loop_cleanly() {
        let tmp = TempDir::new().unwrap();
        let stop = Arc::new(AtomicBool::new(true));
        let source = StubSource::frames(5);
        let closed = source.closed.clone();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            source,
            StubDetector::returning(vec![]),
            RecordingWriter::default(),
            logger.clone(),
            settings(tmp.path(), 1, 0),
        )
        .with_stop_flag(stop);

        let summary = uc.execute(&webcam()).unwrap();

        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.frames, 0);
        assert!(*closed.lock().unwrap());
        assert!(logger
            .messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m == "Interrupted by user"));
    }

    #[test]
    fn test_read_error_after_stop_is_an_interrupt() {
        let tmp = TempDir::new().unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let mut source = StubSource::frames(2);
        source.steps.push_back(Step::Interrupt(stop.clone()));
        let closed = source.closed.clone();
        let logger = RecordingLogger::default();
        let mut uc = use_case(
            source,
            StubDetector::returning(vec![]),
            RecordingWriter::default(),
            logger.clone(),
            settings(tmp.path(), 1, 0),
        )
        .with_stop_flag(stop);

        let summary = uc.execute(&webcam()).unwrap();

        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.saved, 2);
        assert!(*closed.lock().unwrap());
        assert!(logger
            .messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m == "Interrupted by user"));
    }

    #[test]
    fn test_fps_meter_reports_once_per_window() {
        let start = Instant::now();
        let mut meter = FpsMeter::new(start);
        for i in 1..10 {
            assert!(meter.tick(start + Duration::from_millis(i * 100)).is_none());
        }
        let rate = meter.tick(start + Duration::from_secs(1)).unwrap();
        assert_relative_eq!(rate, 10.0);
        assert!(meter.tick(start + Duration::from_millis(1100)).is_none());
    }
}
