//! Tone building blocks - oscillator, gain stage and the voice they form
//!
//! A click is a `ToneSource` connected into a `GainControl`, started on the
//! output and stopped a fixed time later. Pitch and level live in separate
//! stages so each can change without touching the other.

use std::f32::consts::TAU;
use std::time::Duration;

/// Shape of the click sound
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneConfig {
    /// Pitch in Hz
    pub frequency: f32,
    /// Output level (0.0 to 1.0)
    pub gain: f32,
    /// How long each click sounds
    pub duration: Duration,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency: 1000.0,
            gain: 0.5,
            duration: Duration::from_millis(50),
        }
    }
}

/// Sine oscillator at a fixed pitch
#[derive(Clone, Debug)]
pub struct ToneSource {
    frequency: f32,
    /// Phase in cycles (0.0 to 1.0)
    phase: f32,
}

impl ToneSource {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency,
            phase: 0.0,
        }
    }

    #[cfg(test)]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Produce the next sample and advance the phase by one frame
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let sample = (self.phase * TAU).sin();
        self.phase = (self.phase + self.frequency / sample_rate).fract();
        sample
    }

    /// Route this source through a gain stage
    pub fn connect(self, gain: GainControl) -> Voice {
        Voice {
            source: self,
            gain,
            length: f64::INFINITY,
            stop_at: f64::INFINITY,
            finished: false,
        }
    }
}

/// Volume stage
#[derive(Clone, Copy, Debug)]
pub struct GainControl {
    level: f32,
}

impl GainControl {
    /// Create a gain stage; `level` is clamped to 0.0..=1.0
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
        }
    }

    #[cfg(test)]
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn process(&self, input: f32) -> f32 {
        input * self.level
    }
}

/// A source → gain chain that plays for a fixed length
///
/// The mixer pins it to the output clock with `begin()` when it picks the
/// voice up, so the full length is heard however long the voice waited in
/// the queue.
#[derive(Clone, Debug)]
pub struct Voice {
    source: ToneSource,
    gain: GainControl,
    /// Seconds the voice sounds once started
    length: f64,
    /// Output-clock time in seconds; infinite until `begin()`
    stop_at: f64,
    finished: bool,
}

impl Voice {
    /// Set how long the voice sounds once started
    pub fn lasting(mut self, duration: Duration) -> Self {
        self.length = duration.as_secs_f64();
        self
    }

    /// Start the voice at output-clock time `start`
    pub fn begin(&mut self, start: f64) {
        self.stop_at = start + self.length;
    }

    #[cfg(test)]
    pub fn frequency(&self) -> f32 {
        self.source.frequency()
    }

    #[cfg(test)]
    pub fn level(&self) -> f32 {
        self.gain.level()
    }

    #[cfg(test)]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[cfg(test)]
    pub fn stop_at(&self) -> f64 {
        self.stop_at
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Render the frame at output-clock time `time`
    ///
    /// Returns `None` once `time` reaches the stop time.
    pub fn render(&mut self, time: f64, sample_rate: f32) -> Option<f32> {
        if self.finished || time >= self.stop_at {
            self.finished = true;
            return None;
        }
        Some(self.gain.process(self.source.next_sample(sample_rate)))
    }
}
