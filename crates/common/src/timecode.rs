//! Timecode parsing and frame conversion.
//!
//! Event metadata carries wall-clock offsets as `HH:MM:SS` strings. Cuts are
//! made on integer frame indices computed at a fixed deployment rate:
//! `trunc(total_seconds * frame_rate)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EventcutError, EventcutResult};

/// Integer frame index on the timeline.
pub type Frame = i64;

static TIMESPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2}):(\d{2}):(\d{2})").expect("timespan pattern is valid"));

/// A fixed frame rate in frames per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// 59.94 fps, the rate footage is edited at in this deployment.
    pub const DEFAULT: FrameRate = FrameRate(59.94);

    /// Create a rate, rejecting non-finite and non-positive values.
    pub fn new(fps: f64) -> EventcutResult<Self> {
        if fps.is_finite() && fps > 0.0 {
            Ok(Self(fps))
        } else {
            Err(EventcutError::config(format!(
                "frame rate must be a positive number, got {fps}"
            )))
        }
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Frame index for a whole number of seconds, truncated toward zero.
    pub fn frame_at_secs(self, secs: u64) -> Frame {
        (secs as f64 * self.0) as Frame
    }

    /// Duration in seconds of `frames` frames at this rate.
    pub fn frames_to_secs(self, frames: Frame) -> f64 {
        frames as f64 / self.0
    }

    /// Whether two rates agree to within a thousandth of a frame per second.
    pub fn approx_eq(self, other: FrameRate) -> bool {
        (self.0 - other.0).abs() < 1e-3
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = EventcutError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wall-clock offset with whole-second granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespan {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Timespan {
    /// Parse the first `HH:MM:SS` group found in `value`.
    ///
    /// Anything around the group is ignored, so `00:00:05.750` reads as
    /// five seconds.
    pub fn parse(value: &str) -> EventcutResult<Self> {
        let caps = TIMESPAN_RE
            .captures(value)
            .ok_or_else(|| EventcutError::timespan(value))?;

        let field = |i: usize| -> EventcutResult<u32> {
            caps[i]
                .parse::<u32>()
                .map_err(|_| EventcutError::timespan(value))
        };

        Ok(Self {
            hours: field(1)?,
            minutes: field(2)?,
            seconds: field(3)?,
        })
    }

    /// Total seconds represented.
    pub fn total_secs(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }

    /// Frame index of this offset at `rate`.
    pub fn to_frame(&self, rate: FrameRate) -> Frame {
        rate.frame_at_secs(self.total_secs())
    }
}

impl std::str::FromStr for Timespan {
    type Err = EventcutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Timespan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Convert an `HH:MM:SS` string straight to a frame index.
pub fn timespan_to_frame(value: &str, rate: FrameRate) -> EventcutResult<Frame> {
    Ok(Timespan::parse(value)?.to_frame(rate))
}
