use std::fmt;
use std::time::{Duration, Instant};

/// When an annotated frame gets persisted.
///
/// The two cadences are alternatives, never combined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SavePolicy {
    /// Save on every `n`th processed frame: `n`, `2n`, `3n`, ...
    EveryFrames(u64),
    /// Save the first frame, then the first frame at least this long after
    /// the previous save.
    EveryInterval(Duration),
}

impl SavePolicy {
    pub fn every_frames(n: u64) -> Result<Self, String> {
        if n == 0 {
            return Err("save interval must be a positive number of frames".into());
        }
        Ok(SavePolicy::EveryFrames(n))
    }

    pub fn every_interval(interval: Duration) -> Result<Self, String> {
        if interval.is_zero() {
            return Err("save interval must be a positive duration".into());
        }
        Ok(SavePolicy::EveryInterval(interval))
    }
}

impl fmt::Display for SavePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavePolicy::EveryFrames(n) => write!(f, "every {n} frames"),
            SavePolicy::EveryInterval(d) => write!(f, "every {:.3}s", d.as_secs_f64()),
        }
    }
}

/// Applies a [`SavePolicy`] to the sequence of processed frames.
#[derive(Debug)]
pub struct SaveTracker {
    policy: SavePolicy,
    frames_since_save: u64,
    last_save: Option<Instant>,
}

impl SaveTracker {
    pub fn new(policy: SavePolicy) -> Self {
        Self {
            policy,
            frames_since_save: 0,
            last_save: None,
        }
    }

    /// Records one processed frame at `now`. Returns `true` when this frame
    /// is due for saving, in which case the interval restarts.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.frames_since_save += 1;
        let due = match &self.policy {
            SavePolicy::EveryFrames(n) => self.frames_since_save >= *n,
            SavePolicy::EveryInterval(interval) => self
                .last_save
                .map_or(true, |last| now.saturating_duration_since(last) >= *interval),
        };
        if due {
            self.frames_since_save = 0;
            self.last_save = Some(now);
        }
        due
    }
}
