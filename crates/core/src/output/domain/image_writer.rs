use std::path::Path;

use crate::shared::frame::Frame;

/// Persists a single frame as an image file.
pub trait ImageWriter: Send {
    /// Writes `frame` to `path`. The parent directory must already exist.
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
