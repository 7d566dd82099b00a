use std::fs;
use std::path::Path;

use crate::detection::domain::model_probe::{ModelProbe, ModelSummary};
use crate::detection::infrastructure::onnx_session::load_session;

/// Probes an ONNX model by building a session and counting its I/O.
pub struct OnnxModelProbe;

impl ModelProbe for OnnxModelProbe {
    fn probe(&self, model_path: &Path) -> Result<ModelSummary, Box<dyn std::error::Error>> {
        let meta = fs::metadata(model_path)
            .map_err(|e| format!("{}: {e}", model_path.display()))?;
        if !meta.is_file() {
            return Err(format!("{}: not a file", model_path.display()).into());
        }
        if meta.len() == 0 {
            return Err(format!("{}: model file is empty", model_path.display()).into());
        }

        let session = load_session(model_path)?;
        Ok(ModelSummary {
            inputs: session.inputs().len(),
            outputs: session.outputs().len(),
        })
    }
}
