use std::path::PathBuf;

use thiserror::Error;

/// Why a capture run ended abnormally.
///
/// None of these are retried; each maps to a process exit code.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load face detector: {0}")]
    DetectorLoad(#[source] Box<dyn std::error::Error>),
    #[error("failed to open source {uri}: {cause}")]
    SourceUnavailable {
        uri: String,
        #[source]
        cause: Box<dyn std::error::Error>,
    },
    #[error("stream ended after {frames} frames")]
    EndOfStream { frames: u64 },
    #[error("failed to read frame {frame}: {cause}")]
    FrameRead {
        frame: u64,
        #[source]
        cause: Box<dyn std::error::Error>,
    },
    #[error("{stage} failed on frame {frame}: {cause}")]
    Processing {
        stage: &'static str,
        frame: u64,
        #[source]
        cause: Box<dyn std::error::Error>,
    },
    #[error("failed to write {path}: {cause}")]
    Write {
        path: PathBuf,
        #[source]
        cause: Box<dyn std::error::Error>,
    },
}

impl PipelineError {
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::DetectorLoad(_) => 3,
            PipelineError::SourceUnavailable { .. } => 4,
            PipelineError::EndOfStream { .. } | PipelineError::FrameRead { .. } => 5,
            PipelineError::Directory { .. }
            | PipelineError::Processing { .. }
            | PipelineError::Write { .. } => 1,
        }
    }
}
