use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::output::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encodes frames with the `image` crate.
///
/// `.jpg`/`.jpeg` paths go through the JPEG encoder at the configured
/// quality; any other extension is left to `image`'s format detection.
pub struct ImageFileWriter {
    jpeg_quality: u8,
}

impl ImageFileWriter {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }

        let is_jpeg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

        if is_jpeg {
            let out = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(out, self.jpeg_quality);
            encoder.encode(
                frame.data(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )?;
        } else {
            let img =
                image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
                    .ok_or("Failed to create image from frame data")?;
            img.save(path)?;
        }
        Ok(())
    }
}
