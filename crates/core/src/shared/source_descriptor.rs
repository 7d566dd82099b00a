use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const NETWORK_SCHEMES: &[&str] = &["rtsp", "rtsps", "rtmp", "http", "https", "udp", "tcp"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SourceParseError {
    #[error("source descriptor is empty")]
    Empty,
}

/// Where frames come from: a local capture device or anything ffmpeg can open.
///
/// An all-digit value names a device index (`0` is the first webcam);
/// anything else is treated as a URI or file path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceDescriptor {
    Device(u32),
    Uri(String),
}

impl SourceDescriptor {
    pub fn is_device(&self) -> bool {
        matches!(self, SourceDescriptor::Device(_))
    }

    /// Lower-cased URI scheme, if the descriptor has one.
    pub fn scheme(&self) -> Option<String> {
        match self {
            SourceDescriptor::Device(_) => None,
            SourceDescriptor::Uri(uri) => uri
                .split_once("://")
                .map(|(scheme, _)| scheme.to_ascii_lowercase()),
        }
    }

    pub fn is_network(&self) -> bool {
        self.scheme()
            .is_some_and(|s| NETWORK_SCHEMES.contains(&s.as_str()))
    }

    pub fn is_rtsp(&self) -> bool {
        self.scheme().is_some_and(|s| s == "rtsp" || s == "rtsps")
    }

    /// The descriptor with any `user:password@` credentials masked, for logs.
    pub fn redacted(&self) -> String {
        match self {
            SourceDescriptor::Device(index) => format!("device {index}"),
            SourceDescriptor::Uri(uri) => redact_userinfo(uri),
        }
    }
}

impl FromStr for SourceDescriptor {
    type Err = SourceParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SourceParseError::Empty);
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = trimmed.parse::<u32>() {
                return Ok(SourceDescriptor::Device(index));
            }
        }
        Ok(SourceDescriptor::Uri(trimmed.to_string()))
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

fn redact_userinfo(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
        None => uri.to_string(),
    }
}
