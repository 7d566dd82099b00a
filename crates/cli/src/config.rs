use std::path::PathBuf;
use std::time::Duration;

use rtsp_inference_core::capture::domain::capture_options::CaptureOptions;
use rtsp_inference_core::pipeline::capture_loop_use_case::CaptureLoopSettings;
use rtsp_inference_core::pipeline::save_policy::SavePolicy;
use rtsp_inference_core::shared::source_descriptor::SourceDescriptor;

use crate::{Cli, SaveMode};

/// Validated run configuration, built once at startup from flags and
/// environment variables.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source: SourceDescriptor,
    pub save_policy: SavePolicy,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub health_check: bool,
    pub model_path: PathBuf,
    pub model_url: Option<String>,
    pub max_frames: u64,
    pub confidence: f64,
    pub min_face_size: u32,
    pub brighten_alpha: f64,
    pub brighten_beta: i32,
    pub equalize: bool,
    capture: CaptureOptions,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, String> {
        let save_policy = save_policy(cli.save_mode, cli.save_interval)?;
        let read_timeout = positive_seconds("Read timeout", cli.read_timeout)?;
        if !(0.0..=1.0).contains(&cli.confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                cli.confidence
            ));
        }
        if !cli.brighten_alpha.is_finite() || cli.brighten_alpha <= 0.0 {
            return Err(format!(
                "Brighten alpha must be a positive number, got {}",
                cli.brighten_alpha
            ));
        }
        if !(-255..=255).contains(&cli.brighten_beta) {
            return Err(format!(
                "Brighten beta must be between -255 and 255, got {}",
                cli.brighten_beta
            ));
        }
        if cli.width.is_some() != cli.height.is_some() {
            return Err("--width and --height must be given together".to_string());
        }
        if [cli.width, cli.height, cli.fps].contains(&Some(0)) {
            return Err("--width, --height and --fps must be positive".to_string());
        }

        Ok(Self {
            source: cli.rtsp_url,
            save_policy,
            output_dir: cli.output_dir,
            log_dir: cli.log_dir,
            health_check: cli.health_check,
            model_path: cli.model_path,
            model_url: cli.model_url.filter(|url| !url.trim().is_empty()),
            max_frames: cli.max_frames,
            confidence: cli.confidence,
            min_face_size: cli.min_size,
            brighten_alpha: cli.brighten_alpha,
            brighten_beta: cli.brighten_beta,
            equalize: !cli.no_equalize,
            capture: CaptureOptions {
                width: cli.width,
                height: cli.height,
                fps: cli.fps,
                rtsp_transport: cli.rtsp_transport,
                read_timeout,
            },
        })
    }

    pub fn capture_options(&self) -> CaptureOptions {
        self.capture.clone()
    }

    pub fn loop_settings(&self) -> CaptureLoopSettings {
        CaptureLoopSettings {
            save_policy: self.save_policy.clone(),
            output_dir: self.output_dir.clone(),
            max_frames: self.max_frames,
            min_face_size: self.min_face_size,
        }
    }
}

fn save_policy(mode: SaveMode, interval: f64) -> Result<SavePolicy, String> {
    match mode {
        SaveMode::Frames => {
            if !interval.is_finite() || interval < 1.0 || interval.fract() != 0.0 {
                return Err(format!(
                    "Save interval must be a whole number of frames (>= 1), got {interval}"
                ));
            }
            SavePolicy::every_frames(interval as u64)
        }
        SaveMode::Seconds => {
            SavePolicy::every_interval(positive_seconds("Save interval", interval)?)
        }
    }
}

fn positive_seconds(name: &str, secs: f64) -> Result<Duration, String> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("{name} must be a positive number of seconds, got {secs}"));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{name} {secs}: {e}"))
}
