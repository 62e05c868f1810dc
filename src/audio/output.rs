//! Output capability - what the sound emitter needs from the audio host
//!
//! The emitter only ever talks to these traits. `CpalHost` in `engine.rs`
//! is the real implementation; tests substitute their own.

use super::error::AudioError;
use super::tone::{GainControl, ToneSource, Voice};

/// Opens connections to an audio output device
pub trait AudioHost: Send + Sync + 'static {
    type Connection: OutputConnection + 'static;

    fn create_output_connection(&self) -> Result<Self::Connection, AudioError>;
}

/// A live connection to an output device
pub trait OutputConnection: Send {
    /// Hand a voice to the device
    ///
    /// The voice starts on the next buffer the device renders and plays
    /// for its full length from there.
    fn start(&mut self, voice: Voice) -> Result<(), AudioError>;

    fn create_tone_source(&self, frequency: f32) -> ToneSource {
        ToneSource::new(frequency)
    }

    fn create_gain_control(&self, level: f32) -> GainControl {
        GainControl::new(level)
    }
}
