//! Click scheduler - keeps exactly one repeating trigger in step with the
//! current (playing, tempo) pair
//!
//! Every change goes through `resync()`, which cancels whatever trigger is
//! live before arming a new one. Two triggers therefore never coexist, even
//! under rapid start/stop/tempo changes.

use std::sync::Arc;

use super::timer::{TimerHandle, TimerHost};
use crate::tempo::Tempo;

/// Something that produces one click per call
///
/// Called from the timer host's thread, so implementations must be
/// shareable across threads.
pub trait Emit: Send + Sync + 'static {
    fn emit(&self);
}

/// Owns the single repeating trigger and the emitter it drives
pub struct ClickScheduler<H: TimerHost, E: Emit> {
    host: H,
    emitter: Arc<E>,
    /// The live registration, if any
    active: Option<TimerHandle>,
}

impl<H: TimerHost, E: Emit> ClickScheduler<H, E> {
    pub fn new(host: H, emitter: E) -> Self {
        Self {
            host,
            emitter: Arc::new(emitter),
            active: None,
        }
    }

    /// The emitter clicks are sent to
    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Whether a repeating trigger is currently registered
    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Bring the trigger in line with a new (playing, tempo) pair
    ///
    /// Cancels the current trigger, then, if playing, clicks once right
    /// away and arms a new trigger at `tempo.interval()`.
    pub fn resync(&mut self, playing: bool, tempo: Tempo) {
        self.cancel();

        if !playing {
            return;
        }

        // No perceptible delay on Start
        self.emitter.emit();

        let emitter = Arc::clone(&self.emitter);
        match self
            .host
            .set_interval(tempo.interval(), Box::new(move || emitter.emit()))
        {
            Ok(handle) => {
                log::debug!("Clicking every {:?} ({})", tempo.interval(), tempo);
                self.active = Some(handle);
            }
            Err(e) => {
                log::error!("Failed to arm click timer: {}", e);
            }
        }
    }

    /// Cancel the live trigger, if there is one
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            self.host.clear_interval(handle);
        }
    }
}

impl<H: TimerHost, E: Emit> Drop for ClickScheduler<H, E> {
    fn drop(&mut self) {
        self.cancel();
    }
}
