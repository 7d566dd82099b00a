use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Locates faces in a frame.
///
/// Returned regions are in frame pixel coordinates and already clipped
/// to the frame. `&mut self` lets implementations reuse inference buffers.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}
