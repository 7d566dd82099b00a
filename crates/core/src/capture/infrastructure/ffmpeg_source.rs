use crate::capture::domain::capture_options::CaptureOptions;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;
use crate::shared::source_descriptor::SourceDescriptor;
use crate::shared::stream_metadata::StreamMetadata;

#[cfg(target_os = "linux")]
const DEVICE_INPUT_FORMAT: &str = "video4linux2";
#[cfg(target_os = "macos")]
const DEVICE_INPUT_FORMAT: &str = "avfoundation";

/// Captures frames through ffmpeg-next (libavformat + libavdevice + libavcodec).
///
/// URIs and file paths go straight to libavformat, so RTSP, HTTP and local
/// files all work. Device indices are opened through the platform capture
/// driver. Every decoded frame is converted to RGB24.
pub struct FfmpegSource {
    options: CaptureOptions,
    session: Option<DecodeSession>,
}

// Safety: FfmpegSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegSource {}

impl FfmpegSource {
    pub fn new(options: CaptureOptions) -> Self {
        Self {
            options,
            session: None,
        }
    }
}

impl Default for FfmpegSource {
    fn default() -> Self {
        Self::new(CaptureOptions::default())
    }
}

impl FrameSource for FfmpegSource {
    fn open(
        &mut self,
        source: &SourceDescriptor,
    ) -> Result<StreamMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = open_input(source, &self.options)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let stream_index = stream.index();
        let rate = stream.rate();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(format!("{source}: stream reports no frame size").into());
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let metadata = StreamMetadata {
            width,
            height,
            fps,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source: source.redacted(),
        };

        self.session = Some(DecodeSession {
            ictx,
            decoder,
            scaler,
            stream_index,
            width,
            height,
            frame_index: 0,
            draining: false,
        });

        Ok(metadata)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        match self.session.as_mut() {
            Some(session) => session.next_frame(),
            None => Err("FfmpegSource: not opened".into()),
        }
    }

    fn close(&mut self) {
        self.session = None;
    }
}

/// Demuxer, decoder and scaler for one opened source.
struct DecodeSession {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    frame_index: usize,
    draining: bool,
}

impl DecodeSession {
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        loop {
            if let Some(frame) = self.try_receive()? {
                return Ok(Some(frame));
            }
            if self.draining {
                return Ok(None);
            }

            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(&mut self.ictx) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(ffmpeg_next::Error::Eof) => {
                    self.decoder.send_eof()?;
                    self.draining = true;
                }
                Err(e) => return Err(Box::new(e)),
            }
        }
    }

    fn try_receive(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if !frame_ready(self.decoder.receive_frame(&mut decoded))? {
            return Ok(None);
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

/// Interprets a `receive_frame` result. `EAGAIN` (decoder wants more
/// input) and `Eof` (fully drained) mean no frame yet; anything else is a
/// decode failure.
fn frame_ready(result: Result<(), ffmpeg_next::Error>) -> Result<bool, ffmpeg_next::Error> {
    match result {
        Ok(()) => Ok(true),
        Err(ffmpeg_next::Error::Eof) => Ok(false),
        Err(ffmpeg_next::Error::Other { errno }) if errno == ffmpeg_next::error::EAGAIN => {
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn open_input(
    source: &SourceDescriptor,
    options: &CaptureOptions,
) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
    let mut dict = ffmpeg_next::Dictionary::new();
    for (key, value) in options.demuxer_options(source) {
        dict.set(key, &value);
    }

    match source {
        SourceDescriptor::Uri(uri) => Ok(ffmpeg_next::format::input_with_dictionary(uri, dict)?),
        SourceDescriptor::Device(index) => open_device(*index, dict),
    }
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn open_device(
    index: u32,
    dict: ffmpeg_next::Dictionary,
) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
    ffmpeg_next::device::register_all();

    let format = ffmpeg_next::device::input::video()
        .find(|f| f.name().split(',').any(|name| name == DEVICE_INPUT_FORMAT))
        .ok_or_else(|| format!("capture driver '{DEVICE_INPUT_FORMAT}' is not available"))?;

    let path = device_path(index);
    let ctx = ffmpeg_next::format::open_with(&path, &format, dict)?;
    match ctx {
        ffmpeg_next::format::context::Context::Input(input) => Ok(input),
        ffmpeg_next::format::context::Context::Output(_) => {
            Err(format!("{path}: capture driver returned an output context").into())
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn open_device(
    index: u32,
    _dict: ffmpeg_next::Dictionary,
) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
    Err(format!("device {index}: camera indices are only supported on Linux and macOS").into())
}

/// Driver-specific name of the `index`th camera.
#[cfg(target_os = "linux")]
fn device_path(index: u32) -> String {
    format!("/dev/video{index}")
}

#[cfg(target_os = "macos")]
fn device_path(index: u32) -> String {
    format!("{index}:none")
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping the per-row stride padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}
