use std::time::Duration;

/// Where the container image bundles the detector: MediaPipe's BlazeFace
/// short-range model exported to ONNX.
pub const DEFAULT_MODEL_PATH: &str = "models/face_detection_short_range.onnx";

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "app.log";

pub const ARTIFACT_PREFIX: &str = "frame_";
pub const ARTIFACT_EXTENSION: &str = "jpg";

/// Outline colour for detected faces (RGB).
pub const BOX_COLOR: [u8; 3] = [0, 255, 0];
pub const BOX_THICKNESS: u32 = 2;

pub const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);
