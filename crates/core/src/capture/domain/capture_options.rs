use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::source_descriptor::SourceDescriptor;

/// Lower-level transport used for RTSP sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RtspTransport {
    #[default]
    Tcp,
    Udp,
}

impl RtspTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            RtspTransport::Tcp => "tcp",
            RtspTransport::Udp => "udp",
        }
    }
}

impl FromStr for RtspTransport {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "tcp" => Ok(RtspTransport::Tcp),
            "udp" => Ok(RtspTransport::Udp),
            other => Err(format!("RTSP transport must be 'tcp' or 'udp', got '{other}'")),
        }
    }
}

impl fmt::Display for RtspTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Capture properties requested from the driver.
///
/// `None` leaves the driver default in place. Devices honour the frame
/// size and rate; streams ignore them.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub rtsp_transport: RtspTransport,
    /// Network reads that stall longer than this fail instead of blocking.
    pub read_timeout: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            fps: None,
            rtsp_transport: RtspTransport::default(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl CaptureOptions {
    /// Demuxer options (`key`, `value`) for opening `source`.
    pub fn demuxer_options(&self, source: &SourceDescriptor) -> Vec<(&'static str, String)> {
        let mut options = Vec::new();
        if source.is_device() {
            if let (Some(w), Some(h)) = (self.width, self.height) {
                options.push(("video_size", format!("{w}x{h}")));
            }
            if let Some(fps) = self.fps {
                options.push(("framerate", fps.to_string()));
            }
        } else if source.is_network() {
            // libav timeouts are in microseconds.
            let timeout_us = self.read_timeout.as_micros().to_string();
            if source.is_rtsp() {
                options.push(("rtsp_transport", self.rtsp_transport.to_string()));
                options.push(("timeout", timeout_us.clone()));
            }
            options.push(("rw_timeout", timeout_us));
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested(width: Option<u32>, height: Option<u32>, fps: Option<u32>) -> CaptureOptions {
        CaptureOptions {
            width,
            height,
            fps,
            ..CaptureOptions::default()
        }
    }

    #[test]
    fn test_device_gets_size_and_rate() {
        let options = requested(Some(640), Some(480), Some(15));
        let pairs = options.demuxer_options(&SourceDescriptor::Device(0));
        assert_eq!(
            pairs,
            vec![
                ("video_size", "640x480".to_string()),
                ("framerate", "15".to_string())
            ]
        );
    }

    #[test]
    fn test_device_size_needs_both_sides() {
        let options = requested(Some(640), None, None);
        assert!(options
            .demuxer_options(&SourceDescriptor::Device(0))
            .is_empty());
    }

    #[test]
    fn test_rtsp_gets_transport_and_timeouts() {
        let options = requested(Some(640), Some(480), Some(15));
        let source = SourceDescriptor::Uri("rtsp://cam/live".into());
        assert_eq!(
            options.demuxer_options(&source),
            vec![
                ("rtsp_transport", "tcp".to_string()),
                ("timeout", "10000000".to_string()),
                ("rw_timeout", "10000000".to_string())
            ]
        );
    }

    #[test]
    fn test_http_stream_gets_read_timeout() {
        let options = CaptureOptions {
            read_timeout: Duration::from_millis(2500),
            ..CaptureOptions::default()
        };
        let source = SourceDescriptor::Uri("http://cam/mjpeg".into());
        assert_eq!(
            options.demuxer_options(&source),
            vec![("rw_timeout", "2500000".to_string())]
        );
    }

    #[test]
    fn test_file_gets_nothing() {
        let source = SourceDescriptor::Uri("clip.mp4".into());
        assert!(CaptureOptions::default().demuxer_options(&source).is_empty());
    }

    #[test]
    fn test_transport_parse() {
        assert_eq!("UDP".parse::<RtspTransport>(), Ok(RtspTransport::Udp));
        assert!("quic".parse::<RtspTransport>().is_err());
    }
}
