//! Virtual-clock timer host for tests
//!
//! Time only moves when `advance()` is called, so scheduler behaviour can be
//! checked to the microsecond without sleeping.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::timer::{TickFn, TimerError, TimerHandle, TimerHost};

struct Interval {
    handle: TimerHandle,
    period: Duration,
    next_due: Duration,
    tick: TickFn,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    intervals: Vec<Interval>,
}

/// Timer host driven by an explicit virtual clock
///
/// Clones share the same clock and registrations, so a test can keep one
/// clone while the scheduler owns another.
#[derive(Clone, Default)]
pub struct ManualTimer {
    inner: Arc<Mutex<Inner>>,
    now_micros: Arc<AtomicU64>,
    peak_live: Arc<AtomicUsize>,
    armed_total: Arc<AtomicUsize>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the timer was created
    pub fn now(&self) -> Duration {
        Duration::from_micros(self.now_micros.load(Ordering::SeqCst))
    }

    /// Highest number of simultaneously live registrations ever seen
    pub fn peak_live(&self) -> usize {
        self.peak_live.load(Ordering::SeqCst)
    }

    /// Number of `set_interval` calls so far
    pub fn armed_total(&self) -> usize {
        self.armed_total.load(Ordering::SeqCst)
    }

    /// Period of the single live registration, if exactly one exists
    pub fn live_period(&self) -> Option<Duration> {
        let inner = self.inner.lock().unwrap();
        match inner.intervals.as_slice() {
            [only] => Some(only.period),
            _ => None,
        }
    }

    /// Move the clock forward, firing every tick that falls due on the way
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        loop {
            let mut inner = self.inner.lock().unwrap();
            let due = inner
                .intervals
                .iter_mut()
                .filter(|interval| interval.next_due <= target)
                .min_by_key(|interval| interval.next_due);

            let Some(interval) = due else {
                break;
            };

            self.now_micros
                .store(interval.next_due.as_micros() as u64, Ordering::SeqCst);
            interval.next_due += interval.period;
            (interval.tick)();
        }

        self.now_micros
            .store(target.as_micros() as u64, Ordering::SeqCst);
    }
}

impl TimerHost for ManualTimer {
    fn set_interval(&mut self, period: Duration, tick: TickFn) -> Result<TimerHandle, TimerError> {
        let now = self.now();
        let mut inner = self.inner.lock().unwrap();

        let handle = TimerHandle::from_raw(inner.next_id);
        inner.next_id += 1;
        inner.intervals.push(Interval {
            handle,
            period,
            next_due: now + period,
            tick,
        });

        self.peak_live
            .fetch_max(inner.intervals.len(), Ordering::SeqCst);
        self.armed_total.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        let mut inner = self.inner.lock().unwrap();
        inner.intervals.retain(|interval| interval.handle != handle);
    }

    fn live_count(&self) -> usize {
        self.inner.lock().unwrap().intervals.len()
    }
}
