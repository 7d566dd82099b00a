mod config;
mod logging;

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use rtsp_inference_core::annotation::infrastructure::box_outline_annotator::BoxOutlineAnnotator;
use rtsp_inference_core::capture::domain::capture_options::{
    RtspTransport, DEFAULT_READ_TIMEOUT,
};
use rtsp_inference_core::capture::infrastructure::ffmpeg_source::FfmpegSource;
use rtsp_inference_core::detection::domain::face_detector::FaceDetector;
use rtsp_inference_core::detection::infrastructure::model_resolver;
use rtsp_inference_core::detection::infrastructure::onnx_blazeface_detector::{
    OnnxBlazefaceDetector, DEFAULT_CONFIDENCE,
};
use rtsp_inference_core::detection::infrastructure::onnx_model_probe::OnnxModelProbe;
use rtsp_inference_core::enhancement::infrastructure::low_light_enhancer::{
    LowLightEnhancer, DEFAULT_ALPHA, DEFAULT_BETA,
};
use rtsp_inference_core::output::infrastructure::image_file_writer::ImageFileWriter;
use rtsp_inference_core::pipeline::capture_loop_use_case::{CaptureLoopUseCase, StopReason};
use rtsp_inference_core::pipeline::health_check_use_case::HealthCheckUseCase;
use rtsp_inference_core::pipeline::pipeline_error::PipelineError;
use rtsp_inference_core::pipeline::pipeline_logger::LogPipelineLogger;
use rtsp_inference_core::shared::constants::{
    DEFAULT_LOG_DIR, DEFAULT_MODEL_PATH, DEFAULT_OUTPUT_DIR,
};
use rtsp_inference_core::shared::source_descriptor::SourceDescriptor;

use config::AppConfig;

/// Face detection on a webcam or RTSP stream, saving annotated frames.
#[derive(Parser, Debug)]
#[command(name = "rtsp-inference", version)]
pub struct Cli {
    /// Capture source: a device index (0 = first webcam), an RTSP URL or a file.
    #[arg(long, env = "RTSP_URL", default_value = "0")]
    pub rtsp_url: SourceDescriptor,

    /// Save an annotated frame every N frames (or seconds, see --save-mode).
    /// Fractional values are allowed in seconds mode.
    #[arg(long, env = "SAVE_INTERVAL", default_value_t = 5.0)]
    pub save_interval: f64,

    /// Whether --save-interval counts frames or seconds.
    #[arg(long, env = "SAVE_MODE", value_enum, default_value_t = SaveMode::Frames)]
    pub save_mode: SaveMode,

    /// Directory for annotated frames.
    #[arg(long, env = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Directory for app.log.
    #[arg(long, env = "LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Face detection model (ONNX).
    #[arg(long = "model", env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Download the model from this URL when it is not found locally.
    #[arg(long, env = "MODEL_URL")]
    pub model_url: Option<String>,

    /// Verify the detector model loads, then exit 0 (healthy) or 1.
    #[arg(long)]
    pub health_check: bool,

    /// Stop after this many frames (0 = run until the stream ends).
    #[arg(long, default_value_t = 0)]
    pub max_frames: u64,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// Ignore faces smaller than this many pixels on either side.
    #[arg(long, default_value_t = 20)]
    pub min_size: u32,

    /// Contrast gain applied before detection.
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub brighten_alpha: f64,

    /// Brightness offset applied before detection.
    #[arg(long, default_value_t = DEFAULT_BETA, allow_negative_numbers = true)]
    pub brighten_beta: i32,

    /// Skip luma histogram equalization.
    #[arg(long)]
    pub no_equalize: bool,

    /// Requested capture width (devices only).
    #[arg(long)]
    pub width: Option<u32>,

    /// Requested capture height (devices only).
    #[arg(long)]
    pub height: Option<u32>,

    /// Requested capture frame rate (devices only).
    #[arg(long)]
    pub fps: Option<u32>,

    /// Seconds a network read may block before the source counts as lost.
    #[arg(long, env = "READ_TIMEOUT", default_value_t = DEFAULT_READ_TIMEOUT.as_secs_f64())]
    pub read_timeout: f64,

    /// RTSP transport: tcp or udp.
    #[arg(long, default_value_t = RtspTransport::Tcp)]
    pub rtsp_transport: RtspTransport,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SaveMode {
    Frames,
    Seconds,
}

/// Everything that ends the process with a non-zero status.
#[derive(Error, Debug)]
enum AppError {
    #[error("{0}")]
    Config(String),
    #[error("failed to set up logging in {path}: {source}")]
    Logging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Unhealthy(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Logging { .. } | AppError::Unhealthy(_) => 1,
            AppError::Pipeline(e) => e.exit_code(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // The health check reports its own failure.
        if !matches!(e, AppError::Unhealthy(_)) {
            log::error!("{e}");
        }
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_cli(cli).map_err(AppError::Config)?;
    logging::init(&config.log_dir).map_err(|source| AppError::Logging {
        path: config.log_dir.clone(),
        source,
    })?;

    if config.health_check {
        return run_health_check(&config);
    }
    run_capture(&config)
}

fn run_health_check(config: &AppConfig) -> Result<(), AppError> {
    let status = HealthCheckUseCase::new(Box::new(OnnxModelProbe), &config.model_path).execute();
    if status.is_healthy() {
        Ok(())
    } else {
        Err(AppError::Unhealthy(status.to_string()))
    }
}

fn run_capture(config: &AppConfig) -> Result<(), AppError> {
    log::info!("Starting capture from {}", config.source);
    let detector = build_detector(config).map_err(PipelineError::DetectorLoad)?;

    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        log::warn!("Could not install interrupt handler: {e}");
    }

    let mut use_case = CaptureLoopUseCase::new(
        Box::new(FfmpegSource::new(config.capture_options())),
        Box::new(LowLightEnhancer::new(
            config.brighten_alpha,
            config.brighten_beta,
            config.equalize,
        )),
        detector,
        Box::new(BoxOutlineAnnotator::default()),
        Box::new(ImageFileWriter::default()),
        Box::new(LogPipelineLogger::new()),
        config.loop_settings(),
    )
    .with_stop_flag(stop);

    let summary = use_case.execute(&config.source)?;
    match summary.stop_reason {
        StopReason::MaxFrames => log::info!(
            "Finished after {} frames, {} saved",
            summary.frames,
            summary.saved
        ),
        StopReason::Interrupted => log::info!(
            "Stopped after {} frames, {} saved",
            summary.frames,
            summary.saved
        ),
    }
    Ok(())
}

fn build_detector(config: &AppConfig) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {}", config.model_path.display());
    let model_path = model_resolver::resolve(
        &config.model_path,
        config.model_url.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    log::info!("Loading face detector from {}", model_path.display());
    Ok(Box::new(OnnxBlazefaceDetector::new(
        &model_path,
        config.confidence,
    )?))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = downloaded as f64 / total as f64 * 100.0;
        eprint!("\rDownloading model: {pct:.0}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading model: {} KB", downloaded / 1024);
    }
}
