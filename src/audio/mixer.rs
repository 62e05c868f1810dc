//! Mixer - the audio-thread side of the output connection
//!
//! Voices arrive through a lock-free ring buffer and are summed into every
//! output channel until they finish. Each voice is pinned to the mixer's
//! frame clock when it is picked up, so queueing delay never shortens it.

use cpal::{FromSample, Sample};
use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

use super::tone::Voice;

/// Most voices mixed at once; extra voices wait in the queue
pub const MAX_VOICES: usize = 32;

pub struct Mixer {
    /// Voices handed over by the emitter, not yet playing
    pending: HeapCons<Voice>,
    /// Voices currently sounding (capacity reserved up front)
    active: Vec<Voice>,
    /// Frames rendered since the stream opened
    frames: u64,
    sample_rate: f32,
}

impl Mixer {
    pub fn new(pending: HeapCons<Voice>, sample_rate: f32) -> Self {
        Self {
            pending,
            active: Vec::with_capacity(MAX_VOICES),
            frames: 0,
            sample_rate,
        }
    }

    /// Fill an interleaved output buffer
    pub fn fill<T: Sample + FromSample<f32>>(&mut self, data: &mut [T], channels: usize) {
        let sample_rate = self.sample_rate as f64;
        let start_time = self.frames as f64 / sample_rate;

        while self.active.len() < MAX_VOICES {
            match self.pending.try_pop() {
                Some(mut voice) => {
                    voice.begin(start_time);
                    self.active.push(voice);
                }
                None => break,
            }
        }

        for frame in data.chunks_mut(channels) {
            let time = self.frames as f64 / sample_rate;

            let mut mix = 0.0f32;
            for voice in &mut self.active {
                if let Some(sample) = voice.render(time, self.sample_rate) {
                    mix += sample;
                }
            }

            // Same signal on every channel
            let value = T::from_sample(mix.clamp(-1.0, 1.0));
            for sample in frame.iter_mut() {
                *sample = value;
            }
            self.frames += 1;
        }

        self.active.retain(|voice| !voice.is_finished());
    }

    /// Number of voices currently sounding
    #[cfg(test)]
    pub fn active_voices(&self) -> usize {
        self.active.len()
    }
}
