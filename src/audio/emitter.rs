//! Sound emitter - one short tone per call
//!
//! The output connection is opened lazily on the first click and shared by
//! every click after it. If opening fails the emitter remembers the failure
//! and stays silent from then on; there is no retry.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::error::AudioError;
use super::output::{AudioHost, OutputConnection};
use super::tone::ToneConfig;
use crate::scheduler::Emit;

/// State of the lazily-opened connection
enum Slot<C> {
    Unopened,
    Open(C),
    /// Opening failed; holds the message shown to the user
    Failed(String),
}

pub struct SoundEmitter<A: AudioHost> {
    host: A,
    tone: ToneConfig,
    /// Locked by the UI thread (immediate click) and the timer thread
    connection: Mutex<Slot<A::Connection>>,
}

impl<A: AudioHost> SoundEmitter<A> {
    pub fn new(host: A) -> Self {
        Self::with_tone(host, ToneConfig::default())
    }

    pub fn with_tone(host: A, tone: ToneConfig) -> Self {
        Self {
            host,
            tone,
            connection: Mutex::new(Slot::Unopened),
        }
    }

    /// Why the output could not be opened, if it could not
    pub fn output_error(&self) -> Option<String> {
        match &*self.lock() {
            Slot::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Whether the output connection has been opened
    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        matches!(&*self.lock(), Slot::Open(_))
    }

    fn lock(&self) -> MutexGuard<'_, Slot<A::Connection>> {
        // A panic mid-click leaves the slot itself consistent
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Synthesize one click on the shared connection
    fn play_tone(&self) -> Result<(), AudioError> {
        let mut slot = self.lock();

        if let Slot::Unopened = *slot {
            *slot = match self.host.create_output_connection() {
                Ok(connection) => Slot::Open(connection),
                Err(e) => {
                    log::error!("Audio output unavailable, clicks will be silent: {}", e);
                    Slot::Failed(e.to_string())
                }
            };
        }

        let Slot::Open(output) = &mut *slot else {
            return Ok(());
        };

        let source = output.create_tone_source(self.tone.frequency);
        let gain = output.create_gain_control(self.tone.gain);
        let voice = source.connect(gain).lasting(self.tone.duration);

        output.start(voice)
    }
}

impl<A: AudioHost> Emit for SoundEmitter<A> {
    fn emit(&self) {
        if let Err(e) = self.play_tone() {
            log::warn!("Dropped click: {}", e);
        }
    }
}
