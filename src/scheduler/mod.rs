//! Scheduler module - turns a tempo into a steady stream of clicks
//!
//! This module provides:
//! - `TimerHost` capability and the thread-backed `ThreadTimer`
//! - `ClickScheduler`, which owns the single repeating trigger

mod click;
mod timer;

#[cfg(test)]
pub(crate) mod manual;

pub use click::{ClickScheduler, Emit};
#[allow(unused_imports)]
pub use timer::{ThreadTimer, TickFn, TimerError, TimerHandle, TimerHost};

#[cfg(test)]
pub(crate) use click::tests::RecordingEmitter;
