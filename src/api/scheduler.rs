//! Frame pacing

use std::time::{Duration, Instant};

/// Decides when the next frame runs.
///
/// `wait_for_next_frame` suspends until the next frame is due and returns
/// false when no further frames should be scheduled.
pub trait FrameScheduler {
    fn wait_for_next_frame(&mut self) -> bool;
}

/// Paces frames to a fixed rate by sleeping the calling thread
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
    next_frame: Option<Instant>,
}

impl IntervalScheduler {
    pub fn new(rate_hz: f64) -> Self {
        let rate = if rate_hz.is_finite() && rate_hz > 0.0 { rate_hz } else { 60.0 };
        Self {
            interval: Duration::from_secs_f64(1.0 / rate),
            next_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for IntervalScheduler {
    fn wait_for_next_frame(&mut self) -> bool {
        let now = Instant::now();
        let due = self.next_frame.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        // Skip missed frames rather than bursting to catch up
        let base = if due > now { due } else { now };
        self.next_frame = Some(base + self.interval);
        true
    }
}

/// Wraps another scheduler and stops after a fixed number of frames
#[derive(Debug, Clone)]
pub struct LimitedScheduler<S> {
    inner: S,
    remaining: u64,
}

impl<S: FrameScheduler> LimitedScheduler<S> {
    pub fn new(inner: S, frames: u64) -> Self {
        Self {
            inner,
            remaining: frames,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl LimitedScheduler<Immediate> {
    /// Run `frames` frames back to back without sleeping
    pub fn immediate(frames: u64) -> Self {
        Self::new(Immediate, frames)
    }
}

impl<S: FrameScheduler> FrameScheduler for LimitedScheduler<S> {
    fn wait_for_next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.inner.wait_for_next_frame()
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl FrameScheduler for Immediate {
    fn wait_for_next_frame(&mut self) -> bool {
        true
    }
}
