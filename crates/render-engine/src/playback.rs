//! Playback transport and the per-frame loop.
//!
//! While playing, project time advances by the wall-clock delta between
//! display refreshes. Reaching the end pauses and rewinds to 0; there is
//! no looping. Waiting for the next refresh is the loop's only suspension
//! point.

use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use layercut_common::FrameClock;
use layercut_timeline_core::Store;

use crate::compositor::{compose_frame, FrameComposition};

/// Result of advancing the transport by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; time unchanged.
    Idle,
    Advanced,
    /// Reached the end: now paused at 0.
    Ended,
}

/// Play/pause/seek control over a [`Store`].
pub struct Transport<'a> {
    store: &'a mut Store,
}

impl<'a> Transport<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Start playing. Playing from the end restarts at 0.
    pub fn play(&mut self) {
        let state = self.store.state();
        if state.current_time >= state.total_duration {
            self.store.set_current_time(0.0);
        }
        self.store.set_playing(true);
        tracing::debug!(time = self.store.state().current_time, "Playback started");
    }

    pub fn pause(&mut self) {
        self.store.set_playing(false);
    }

    /// Flip between playing and paused. Returns the new playing state.
    pub fn toggle(&mut self) -> bool {
        if self.store.state().is_playing {
            self.pause();
            false
        } else {
            self.play();
            true
        }
    }

    /// Pause and rewind to 0.
    pub fn stop(&mut self) {
        self.store.set_playing(false);
        self.store.set_current_time(0.0);
    }

    /// Jump to `time`, clamped to the project. Play state is unchanged.
    pub fn seek(&mut self, time: f64) {
        self.store.seek(time);
    }

    /// Advance by `delta_secs` of wall-clock time.
    pub fn tick(&mut self, delta_secs: f64) -> TickOutcome {
        let state = self.store.state();
        if !state.is_playing {
            return TickOutcome::Idle;
        }
        let next = state.current_time + delta_secs.max(0.0);
        if next >= state.total_duration {
            self.store.set_playing(false);
            self.store.set_current_time(0.0);
            tracing::debug!("Playback reached the end");
            return TickOutcome::Ended;
        }
        self.store.set_current_time(next);
        TickOutcome::Advanced
    }
}

/// Refresh period for `refresh_hz`, never shorter than one nanosecond.
fn refresh_period(refresh_hz: u32) -> Duration {
    Duration::from_nanos((1_000_000_000 / refresh_hz.max(1) as u64).max(1))
}

/// Source of display refreshes.
#[async_trait::async_trait]
pub trait FrameScheduler: Send {
    /// Wait for the next refresh. `None` once the scheduler is closed.
    async fn next_frame(&mut self) -> Option<Instant>;
}

/// Refreshes driven by a tokio interval. Late ticks are skipped rather
/// than bunched up. Must be created inside a tokio runtime.
pub struct IntervalScheduler {
    interval: tokio::time::Interval,
}

impl IntervalScheduler {
    pub fn new(refresh_hz: u32) -> Self {
        let mut interval = tokio::time::interval(refresh_period(refresh_hz));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait::async_trait]
impl FrameScheduler for IntervalScheduler {
    async fn next_frame(&mut self) -> Option<Instant> {
        Some(self.interval.tick().await.into_std())
    }
}

/// Simulated refreshes at a fixed period that do not wait on the wall
/// clock. Each frame reports `start + n * period`.
pub struct SteppedScheduler {
    start: Instant,
    period: Duration,
    frame: u32,
    limit: Option<u32>,
}

impl SteppedScheduler {
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            start: Instant::now(),
            period: refresh_period(refresh_hz),
            frame: 0,
            limit: None,
        }
    }

    /// Close after `frames` refreshes.
    pub fn with_limit(mut self, frames: u32) -> Self {
        self.limit = Some(frames);
        self
    }
}

#[async_trait::async_trait]
impl FrameScheduler for SteppedScheduler {
    async fn next_frame(&mut self) -> Option<Instant> {
        if self.limit.is_some_and(|limit| self.frame >= limit) {
            return None;
        }
        tokio::task::yield_now().await;
        let now = self.start + self.period * self.frame;
        self.frame += 1;
        Some(now)
    }
}

/// Drives tick, compose, and render once per refresh while playing.
pub struct PlaybackLoop<S> {
    scheduler: S,
    clock: FrameClock,
}

impl<S: FrameScheduler> PlaybackLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            clock: FrameClock::new(),
        }
    }

    /// Run until playback pauses, ends, or the scheduler closes. Calls
    /// `on_frame` with each composed frame and returns how many were
    /// rendered.
    pub async fn run<F>(&mut self, store: &mut Store, mut on_frame: F) -> u64
    where
        F: FnMut(&FrameComposition),
    {
        self.clock.reset();
        let mut frames = 0;

        while store.state().is_playing {
            let Some(now) = self.scheduler.next_frame().await else {
                tracing::debug!("Frame scheduler closed");
                break;
            };
            let delta = self.clock.tick(now);
            let outcome = Transport::new(store).tick(delta);

            let state = store.state();
            on_frame(&compose_frame(state, state.current_time));
            frames += 1;

            if outcome == TickOutcome::Ended {
                break;
            }
        }
        frames
    }

    pub fn into_scheduler(self) -> S {
        self.scheduler
    }
}
