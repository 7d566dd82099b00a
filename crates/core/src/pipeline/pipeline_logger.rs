use std::fmt;
use std::path::Path;
use std::time::Instant;

/// The one log record every processed frame produces.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRecord {
    /// 1-based count of frames processed so far.
    pub frame: u64,
    pub faces: usize,
    /// Enhancement plus detection wall time.
    pub infer_ms: f64,
}

impl fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame={} faces={} infer_ms={:.2}",
            self.frame, self.faces, self.infer_ms
        )
    }
}

/// Cross-cutting logger for capture loop events.
///
/// Keeps the loop free of any particular sink so tests can record what
/// it reports while the CLI routes everything through the `log` crate.
pub trait PipelineLogger: Send {
    /// One record per processed frame.
    fn frame(&mut self, record: &FrameRecord);

    /// An artifact was written; `total` counts saves in this run.
    fn saved(&mut self, path: &Path, total: u64);

    /// Measured processing rate over the last reporting window.
    fn throughput(&mut self, fps: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Routes loop events to the `log` facade and keeps latency totals for
/// the summary line.
pub struct LogPipelineLogger {
    start_time: Instant,
    frames: u64,
    saved: u64,
    total_infer_ms: f64,
    max_infer_ms: f64,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            frames: 0,
            saved: 0,
            total_infer_ms: 0.0,
            max_infer_ms: 0.0,
        }
    }

    pub fn average_infer_ms(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_infer_ms / self.frames as f64
        }
    }

    /// Returns the formatted summary, or `None` if no frame was processed.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 {
            return None;
        }
        Some(format!(
            "Run summary: frames={} saved={} avg_infer_ms={:.2} max_infer_ms={:.2} elapsed={:.1}s",
            self.frames,
            self.saved,
            self.average_infer_ms(),
            self.max_infer_ms,
            self.start_time.elapsed().as_secs_f64()
        ))
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn frame(&mut self, record: &FrameRecord) {
        self.frames += 1;
        self.total_infer_ms += record.infer_ms;
        self.max_infer_ms = self.max_infer_ms.max(record.infer_ms);
        log::info!("{record}");
    }

    fn saved(&mut self, path: &Path, total: u64) {
        self.saved = total;
        log::info!("Saved: {} (total saved: {total})", path.display());
    }

    fn throughput(&mut self, fps: f64) {
        log::info!("FPS={fps:.2}");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("{text}");
        }
    }
}
