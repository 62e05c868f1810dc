//! Repeating timers - the host capability the click scheduler runs on
//!
//! `TimerHost` is the seam between the scheduler and whatever delivers
//! periodic callbacks. `ThreadTimer` is the production host: each
//! registration gets its own thread that sleeps until the next deadline.
//!
//! ## Design Notes
//!
//! Deadlines are fixed-rate (`start + n * period`) so scheduling jitter does
//! not accumulate into tempo drift. A tick that arrives late is delivered
//! once; any deadlines it overran are skipped rather than replayed.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Callback run on every timer tick
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Errors that can occur when registering a timer
#[derive(Error, Debug)]
pub enum TimerError {
    #[error("Failed to spawn timer thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Opaque identifier for one repeating-timer registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

/// Something that can run a callback repeatedly at a fixed period
pub trait TimerHost {
    /// Register `tick` to run every `period`, starting one period from now
    fn set_interval(&mut self, period: Duration, tick: TickFn) -> Result<TimerHandle, TimerError>;

    /// Cancel a registration
    ///
    /// Once this returns the callback will not run again. Clearing a handle
    /// that is unknown or already cleared does nothing.
    fn clear_interval(&mut self, handle: TimerHandle);

    /// Number of registrations currently live
    fn live_count(&self) -> usize;
}

/// A live thread registration
struct Registration {
    /// Dropping this wakes the thread and tells it to exit
    cancel: Sender<()>,
    thread: JoinHandle<()>,
}

/// Thread-backed timer host
pub struct ThreadTimer {
    next_id: u64,
    live: HashMap<TimerHandle, Registration>,
}

impl ThreadTimer {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            live: HashMap::new(),
        }
    }
}

impl Default for ThreadTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerHost for ThreadTimer {
    fn set_interval(&mut self, period: Duration, tick: TickFn) -> Result<TimerHandle, TimerError> {
        let handle = TimerHandle::from_raw(self.next_id);
        self.next_id += 1;

        let (cancel, cancelled) = mpsc::channel();
        let thread = thread::Builder::new()
            .name(format!("click-timer-{}", handle.0))
            .spawn(move || run_interval(period, tick, cancelled))?;

        self.live.insert(handle, Registration { cancel, thread });
        log::debug!("Timer {:?} armed every {:?}", handle, period);
        Ok(handle)
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        let Some(registration) = self.live.remove(&handle) else {
            return;
        };

        drop(registration.cancel);
        // Join so a tick already in flight finishes before we return
        if registration.thread.join().is_err() {
            log::error!("Timer {:?} thread panicked", handle);
        }
        log::debug!("Timer {:?} cleared", handle);
    }

    fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        let handles: Vec<TimerHandle> = self.live.keys().copied().collect();
        for handle in handles {
            self.clear_interval(handle);
        }
    }
}

/// Body of a timer thread: tick on every deadline until cancelled
fn run_interval(period: Duration, mut tick: TickFn, cancelled: Receiver<()>) {
    let mut deadline = Instant::now() + period;

    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        match cancelled.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {
                tick();

                deadline += period;
                let now = Instant::now();
                while deadline <= now {
                    deadline += period;
                }
            }
            // Sender dropped (or an explicit cancel): stop ticking
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_tick(count: &Arc<AtomicUsize>) -> TickFn {
        let count = Arc::clone(count);
        Box::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_ticks_repeatedly() {
        let mut timer = ThreadTimer::new();
        let count = Arc::new(AtomicUsize::new(0));

        let handle = timer
            .set_interval(Duration::from_millis(20), counting_tick(&count))
            .unwrap();
        thread::sleep(Duration::from_millis(150));
        timer.clear_interval(handle);

        // Seven deadlines fit in 150ms
        let ticks = count.load(Ordering::SeqCst);
        assert!((3..=9).contains(&ticks), "expected ~7 ticks, got {}", ticks);
    }

    #[test]
    fn test_slow_tick_skips_missed_deadlines() {
        let mut timer = ThreadTimer::new();
        let count = Arc::new(AtomicUsize::new(0));

        // The first tick overruns fifteen periods
        let tick_count = Arc::clone(&count);
        let handle = timer
            .set_interval(
                Duration::from_millis(20),
                Box::new(move || {
                    if tick_count.fetch_add(1, Ordering::SeqCst) == 0 {
                        thread::sleep(Duration::from_millis(300));
                    }
                }),
            )
            .unwrap();
        thread::sleep(Duration::from_millis(400));
        timer.clear_interval(handle);

        // Replaying the overrun would add fifteen ticks back to back
        let ticks = count.load(Ordering::SeqCst);
        assert!((1..=10).contains(&ticks), "missed deadlines replayed: {} ticks", ticks);
    }

    #[test]
    fn test_does_not_tick_before_first_period() {
        let mut timer = ThreadTimer::new();
        let count = Arc::new(AtomicUsize::new(0));

        let handle = timer
            .set_interval(Duration::from_millis(500), counting_tick(&count))
            .unwrap();
        thread::sleep(Duration::from_millis(50));
        timer.clear_interval(handle);

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clear_stops_ticks() {
        let mut timer = ThreadTimer::new();
        let count = Arc::new(AtomicUsize::new(0));

        let handle = timer
            .set_interval(Duration::from_millis(10), counting_tick(&count))
            .unwrap();
        thread::sleep(Duration::from_millis(50));
        timer.clear_interval(handle);
        assert_eq!(timer.live_count(), 0);

        let after_clear = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), after_clear);
    }

    #[test]
    fn test_clear_unknown_handle_is_noop() {
        let mut timer = ThreadTimer::new();
        timer.clear_interval(TimerHandle::from_raw(42));

        let handle = timer
            .set_interval(Duration::from_millis(100), Box::new(|| {}))
            .unwrap();
        timer.clear_interval(handle);
        timer.clear_interval(handle);
        assert_eq!(timer.live_count(), 0);
    }

    #[test]
    fn test_drop_clears_everything() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let mut timer = ThreadTimer::new();
            timer
                .set_interval(Duration::from_millis(10), counting_tick(&count))
                .unwrap();
            timer
                .set_interval(Duration::from_millis(10), counting_tick(&count))
                .unwrap();
            assert_eq!(timer.live_count(), 2);
        }

        let after_drop = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }
}
