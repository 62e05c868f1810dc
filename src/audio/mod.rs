//! Audio module - turns a click request into sound
//!
//! This module provides:
//! - Tone building blocks (source, gain, voice)
//! - A mixer that runs on the audio callback
//! - The cpal-backed output connection
//! - `SoundEmitter`, which the scheduler calls once per beat

mod emitter;
mod engine;
mod error;
mod mixer;
mod output;
mod tone;

// Re-export public types
pub use emitter::SoundEmitter;
pub use engine::CpalHost;
#[allow(unused_imports)]
pub use engine::CpalConnection;
#[allow(unused_imports)]
pub use error::AudioError;
#[allow(unused_imports)]
pub use output::{AudioHost, OutputConnection};
#[allow(unused_imports)]
pub use tone::{GainControl, ToneConfig, ToneSource, Voice};
