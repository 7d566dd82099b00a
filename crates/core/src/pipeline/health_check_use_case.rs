use std::fmt;
use std::path::PathBuf;

use crate::detection::domain::model_probe::{ModelProbe, ModelSummary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy(ModelSummary),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy(_))
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_healthy() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy(summary) => write!(
                f,
                "Health check OK: detector loaded ({} inputs, {} outputs)",
                summary.inputs, summary.outputs
            ),
            HealthStatus::Unhealthy(reason) => write!(f, "Health check failed: {reason}"),
        }
    }
}

/// Liveness probe for container orchestrators.
///
/// Only loads the detector from its configured location. No capture
/// source is opened and nothing is downloaded, so the check runs on
/// hosts without a camera.
pub struct HealthCheckUseCase {
    probe: Box<dyn ModelProbe>,
    model_path: PathBuf,
}

impl HealthCheckUseCase {
    pub fn new(probe: Box<dyn ModelProbe>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            probe,
            model_path: model_path.into(),
        }
    }

    pub fn execute(&self) -> HealthStatus {
        let status = match self.probe.probe(&self.model_path) {
            Ok(summary) if summary.is_empty() => HealthStatus::Unhealthy(format!(
                "detector model {} is empty",
                self.model_path.display()
            )),
            Ok(summary) => HealthStatus::Healthy(summary),
            Err(e) => HealthStatus::Unhealthy(format!(
                "cannot load detector model {}: {e}",
                self.model_path.display()
            )),
        };

        if status.is_healthy() {
            log::info!("{status}");
        } else {
            log::error!("{status}");
        }
        status
    }
}
