use crate::shared::frame::Frame;
use crate::shared::source_descriptor::SourceDescriptor;
use crate::shared::stream_metadata::StreamMetadata;

/// Pulls decoded frames from a camera, stream or file.
///
/// The pipeline only sees `Frame`s; demuxing, decoding and pixel format
/// conversion stay inside the implementation.
pub trait FrameSource: Send {
    /// Opens the source. Fails when the device or stream is unavailable.
    fn open(
        &mut self,
        source: &SourceDescriptor,
    ) -> Result<StreamMetadata, Box<dyn std::error::Error>>;

    /// Blocks until the next frame is decoded.
    ///
    /// `Ok(None)` means the stream ended. Errors are read or decode
    /// failures; the source is not expected to recover from them.
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device or connection. Safe to call more than once.
    fn close(&mut self);
}
