use crate::shared::frame::Frame;

/// Adjusts a frame in place before detection.
///
/// The enhanced frame is also what gets annotated and saved, so the
/// artifact shows exactly what the detector saw.
pub trait FrameEnhancer: Send {
    fn enhance(&self, frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>>;
}

/// Leaves frames untouched.
pub struct IdentityEnhancer;

impl FrameEnhancer for IdentityEnhancer {
    fn enhance(&self, _frame: &mut Frame) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
