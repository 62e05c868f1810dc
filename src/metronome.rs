//! Metronome - tempo and playback state, owned by the UI
//!
//! Every real change to either field triggers exactly one scheduler resync.
//! Setting a field to the value it already holds does nothing.

use crate::scheduler::{ClickScheduler, Emit, TimerHost};
use crate::tempo::Tempo;

/// Tempo/playback state plus the scheduler that follows it
///
/// Dropping the metronome drops its scheduler, which cancels any live
/// trigger.
pub struct Metronome<H: TimerHost, E: Emit> {
    tempo: Tempo,
    playing: bool,
    scheduler: ClickScheduler<H, E>,
}

impl<H: TimerHost, E: Emit> Metronome<H, E> {
    /// Create a stopped metronome at the default tempo
    pub fn new(timer: H, emitter: E) -> Self {
        Self {
            tempo: Tempo::default(),
            playing: false,
            scheduler: ClickScheduler::new(timer, emitter),
        }
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The emitter clicks are sent to
    pub fn emitter(&self) -> &E {
        self.scheduler.emitter()
    }

    /// Change the tempo; while playing this restarts the beat at the new rate
    pub fn set_tempo(&mut self, tempo: Tempo) {
        if tempo == self.tempo {
            return;
        }
        log::info!("Tempo: {} -> {}", self.tempo, tempo);
        self.tempo = tempo;
        self.resync();
    }

    /// Start or stop playback
    pub fn set_playing(&mut self, playing: bool) {
        if playing == self.playing {
            return;
        }
        log::info!(
            "{} at {}",
            if playing { "Starting" } else { "Stopping" },
            self.tempo
        );
        self.playing = playing;
        self.resync();
    }

    /// What the "Start" control does
    pub fn start(&mut self) {
        self.set_playing(true);
    }

    /// What the "Stop" control does
    pub fn stop(&mut self) {
        self.set_playing(false);
    }

    fn resync(&mut self) {
        self.scheduler.resync(self.playing, self.tempo);
    }
}
