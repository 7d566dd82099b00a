use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::shared::constants::{ARTIFACT_EXTENSION, ARTIFACT_PREFIX};

/// Builds artifact paths of the form `frame_20240131_235959_123456.jpg`.
///
/// Two saves inside the same microsecond, or a file left over from an
/// earlier run, get a `_1`, `_2`, ... suffix instead of being overwritten.
pub struct ArtifactNamer {
    dir: PathBuf,
    last_stem: Option<String>,
    repeat: u32,
}

impl ArtifactNamer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_stem: None,
            repeat: 0,
        }
    }

    /// Next unused path for a save happening at `now`.
    pub fn next_path(&mut self, now: DateTime<Utc>) -> PathBuf {
        let stem = format!("{ARTIFACT_PREFIX}{}", now.format("%Y%m%d_%H%M%S_%6f"));
        if self.last_stem.as_deref() == Some(stem.as_str()) {
            self.repeat += 1;
        } else {
            self.repeat = 0;
            self.last_stem = Some(stem.clone());
        }

        loop {
            let name = if self.repeat == 0 {
                format!("{stem}.{ARTIFACT_EXTENSION}")
            } else {
                format!("{stem}_{}.{ARTIFACT_EXTENSION}", self.repeat)
            };
            let path = self.dir.join(name);
            if !path.exists() {
                return path;
            }
            self.repeat += 1;
        }
    }
}
