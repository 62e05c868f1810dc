//! Tempo - a bounded beats-per-minute value
//!
//! The slider only produces values inside `[MIN_BPM, MAX_BPM]`, and the
//! constructor clamps anything else, so a `Tempo` is always in range.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Slowest supported tempo
pub const MIN_BPM: u16 = 40;
/// Fastest supported tempo
pub const MAX_BPM: u16 = 220;
/// Tempo the application starts with
pub const DEFAULT_BPM: u16 = 120;

/// Microseconds in one minute
const MICROS_PER_MINUTE: u64 = 60_000_000;

/// Tempo in beats per minute, always within `[MIN_BPM, MAX_BPM]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo(u16);

impl Tempo {
    /// Create a tempo, clamping `bpm` into the supported range
    pub fn new(bpm: u16) -> Self {
        Self(bpm.clamp(MIN_BPM, MAX_BPM))
    }

    /// The inclusive BPM range, as used by the slider
    pub fn range() -> RangeInclusive<u16> {
        MIN_BPM..=MAX_BPM
    }

    /// Beats per minute
    pub fn bpm(self) -> u16 {
        self.0
    }

    /// Time between two clicks: `60000 / bpm` milliseconds
    ///
    /// Computed in whole microseconds, which is exact for every BPM that
    /// divides a minute evenly and within 1 µs otherwise.
    pub fn interval(self) -> Duration {
        Duration::from_micros(MICROS_PER_MINUTE / u64::from(self.0))
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_BPM)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.0)
    }
}
