//! Clock and pacing utilities for playback and export.
//!
//! The playback clock advances project time by the wall-clock delta
//! between display refreshes. This module provides:
//! - Measuring per-frame wall-clock deltas
//! - Converting between seconds and nanoseconds
//! - Pacing frame capture at a target rate

use std::time::Instant;

/// Measures the wall-clock time elapsed between consecutive frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Record a frame at `now` and return seconds since the previous frame.
    ///
    /// The first frame after construction or [`FrameClock::reset`] returns 0.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last = Some(now);
        delta
    }

    /// Forget the previous frame so the next tick starts from zero.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Convert nanoseconds to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs.max(0.0) * 1_000_000_000.0) as u64
    }
}

/// Frame rate controller for capture sampling.
///
/// Ticks are kept on a fixed grid of `1/target_hz` so a capture rate that
/// does not divide the refresh rate still averages out to the target.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    next_due_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            next_due_ns: None,
        }
    }

    /// Check if the next grid point has been reached.
    /// Returns true and advances the grid if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        let interval = self.target_interval_ns;
        // Absorbs rounding in callers that derive nanoseconds from f64 seconds.
        let slack = interval / 20;
        match self.next_due_ns {
            None => {
                self.next_due_ns = Some(current_ns + interval);
                true
            }
            Some(due) if current_ns + slack >= due => {
                let next = due + interval;
                // More than a whole interval behind: restart the grid.
                self.next_due_ns = Some(if current_ns >= next {
                    current_ns + interval
                } else {
                    next
                });
                true
            }
            _ => false,
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}
