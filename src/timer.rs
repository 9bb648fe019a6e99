use std::fmt;
use std::iter::FusedIterator;

use bevy_ecs::prelude::*;

use crate::clock::{wall_clock, Clock};
use crate::progress::{ProgressState, ProgressValue};

/// A progress value driven by elapsed time.
///
/// The current value is never stored: every read computes
/// `clock() - start`. This means a timer can be queried from as many places
/// as you like, as often as you like, without any of them needing to "tick"
/// it.
///
/// The target value is the duration, in the same unit as the clock
/// (seconds, for the built-in clocks).
///
/// ```rust
/// # use progress_bars::prelude::*;
/// let clock = ManualClock::new(100.0);
/// let mut timer = CountdownTimer::with_clock(2.0, clock.source());
/// clock.advance(1.0);
/// assert_eq!(timer.normalized_progress(), 0.5);
/// clock.advance(1.0);
/// assert!(timer.is_complete());
/// ```
///
/// Pausing is not supported. Create a new timer for the remaining duration
/// instead.
#[derive(Component)]
pub struct CountdownTimer {
    state: ProgressState,
    start: f32,
    clock: Clock,
}

impl fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("state", &self.state)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

/// An unstarted timer: zero duration on the wall clock.
///
/// Since the duration is zero, it already reports complete, the same as
/// [`CountdownTimer::completed`]. Call [`start`](CountdownTimer::start)
/// to give it a duration.
impl Default for CountdownTimer {
    fn default() -> Self {
        Self {
            state: ProgressState::default(),
            start: 0.0,
            clock: wall_clock(),
        }
    }
}

impl CountdownTimer {
    /// Create a timer running on real time, started now.
    pub fn new(duration: f32) -> Self {
        let mut timer = Self::default();
        timer.start(duration);
        timer
    }

    /// Create a timer running on a custom clock, started now.
    pub fn with_clock(
        duration: f32,
        clock: impl Fn() -> f32 + Send + Sync + 'static,
    ) -> Self {
        let mut timer = Self {
            clock: Box::new(clock),
            ..Default::default()
        };
        timer.start(duration);
        timer
    }

    /// A timer that is already complete.
    ///
    /// Useful as a "nothing to wait for" placeholder.
    pub fn completed() -> Self {
        let mut timer = Self::default();
        timer.state.reached = true;
        timer
    }

    /// (Re)start the timer with a new duration.
    pub fn start(&mut self, duration: f32) {
        self.start = (self.clock)();
        self.state.target = duration;
        self.state.reached = false;
    }

    /// The duration the timer counts towards.
    pub fn duration(&self) -> f32 {
        self.state.target
    }

    /// Time since the timer was (re)started.
    pub fn elapsed(&self) -> f32 {
        (self.clock)() - self.start
    }

    /// Time left until the duration is reached. Never negative.
    pub fn remaining(&self) -> f32 {
        (self.state.target - self.elapsed()).max(0.0)
    }

    /// Restart the timer and drive it step by step.
    ///
    /// Returns a lazy iterator meant to be advanced once per frame (or
    /// whatever your external tick is). Nothing happens until the first call
    /// to `next`, which restarts the timer. Each call to `next` while the
    /// timer is running calls `step` with the timer and yields. Once the
    /// timer is complete, the iterator ends.
    ///
    /// Dropping the iterator cancels the run.
    pub fn run_each<F>(&mut self, step: F) -> RunEach<'_, F>
    where
        F: FnMut(&mut CountdownTimer),
    {
        RunEach {
            timer: self,
            step,
            started: false,
            done: false,
        }
    }

    /// Restart the timer and wait for it to complete.
    ///
    /// Like [`run_each`](Self::run_each), but there is no per-step callback.
    /// Instead, `on_complete` is called exactly once, on the call to `next`
    /// that finds the timer complete, right before the iterator ends.
    pub fn run_then<F>(&mut self, on_complete: F) -> RunThen<'_, F>
    where
        F: FnOnce(&mut CountdownTimer),
    {
        RunThen {
            timer: self,
            on_complete: Some(on_complete),
            started: false,
        }
    }
}

impl ProgressValue for CountdownTimer {
    fn state(&self) -> &ProgressState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProgressState {
        &mut self.state
    }

    fn current_value(&self) -> f32 {
        self.elapsed()
    }

    fn reset_value(&mut self) {
        self.start = (self.clock)();
    }
}

/// Iterator returned by [`CountdownTimer::run_each`].
pub struct RunEach<'a, F> {
    timer: &'a mut CountdownTimer,
    step: F,
    started: bool,
    done: bool,
}

impl<F> RunEach<'_, F> {
    /// The timer being driven.
    pub fn timer(&self) -> &CountdownTimer {
        &*self.timer
    }
}

impl<F: FnMut(&mut CountdownTimer)> Iterator for RunEach<'_, F> {
    type Item = ();

    fn next(&mut self) -> Option<()> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.timer.restart();
        }
        if self.timer.is_complete() {
            self.done = true;
            return None;
        }
        (self.step)(&mut *self.timer);
        Some(())
    }
}

impl<F: FnMut(&mut CountdownTimer)> FusedIterator for RunEach<'_, F> {}

/// Iterator returned by [`CountdownTimer::run_then`].
pub struct RunThen<'a, F> {
    timer: &'a mut CountdownTimer,
    on_complete: Option<F>,
    started: bool,
}

impl<F> RunThen<'_, F> {
    /// The timer being driven.
    pub fn timer(&self) -> &CountdownTimer {
        &*self.timer
    }
}

impl<F: FnOnce(&mut CountdownTimer)> Iterator for RunThen<'_, F> {
    type Item = ();

    fn next(&mut self) -> Option<()> {
        if self.on_complete.is_none() {
            return None;
        }
        if !self.started {
            self.started = true;
            self.timer.restart();
        }
        if !self.timer.is_complete() {
            return Some(());
        }
        if let Some(on_complete) = self.on_complete.take() {
            on_complete(&mut *self.timer);
        }
        None
    }
}

impl<F: FnOnce(&mut CountdownTimer)> FusedIterator for RunThen<'_, F> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::progress::Normalization;

    fn manual_timer(start: f32, duration: f32) -> (ManualClock, CountdownTimer) {
        let clock = ManualClock::new(start);
        let timer = CountdownTimer::with_clock(duration, clock.source());
        (clock, timer)
    }

    #[test]
    fn completes_after_duration() {
        let (clock, mut timer) = manual_timer(0.0, 5.0);
        assert!(!timer.is_complete());
        clock.advance(2.5);
        assert_eq!(timer.normalized_progress(), 0.5);
        timer.set_normalization(Normalization::Unlimited);
        assert_eq!(timer.normalized_progress(), 0.5);
        clock.advance(2.5);
        assert!(timer.is_complete());
    }

    #[test]
    fn follows_a_fake_clock() {
        let (clock, mut timer) = manual_timer(100.0, 2.0);
        assert_eq!(timer.normalized_progress(), 0.0);

        clock.set(101.0);
        assert_eq!(timer.normalized_progress(), 0.5);
        assert!(!timer.is_complete());
        assert_eq!(timer.remaining(), 1.0);

        clock.set(102.0);
        assert!(timer.is_complete());
        assert_eq!(timer.remaining(), 0.0);

        clock.set(150.0);
        assert_eq!(timer.normalized_progress(), 1.0);
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn restart_resets_progress() {
        let (clock, mut timer) = manual_timer(10.0, 4.0);
        clock.advance(3.0);
        assert_eq!(timer.normalized_progress(), 0.75);

        timer.restart();
        assert_eq!(timer.normalized_progress(), 0.0);
        assert_eq!(timer.elapsed(), 0.0);
        assert_eq!(timer.duration(), 4.0);
    }

    #[test]
    fn start_changes_duration_and_clears_finish() {
        let (clock, mut timer) = manual_timer(0.0, 1.0);
        timer.finish();
        assert!(timer.is_complete());

        clock.advance(0.5);
        timer.start(10.0);
        assert!(!timer.is_complete());
        clock.advance(5.0);
        assert_eq!(timer.normalized_progress(), 0.5);
    }

    #[test]
    fn completed_sentinel() {
        let mut timer = CountdownTimer::completed();
        assert!(timer.is_complete());
        timer.restart();
        // Zero duration: complete as soon as it runs.
        assert!(timer.is_complete());
    }

    #[test]
    fn default_is_unstarted_and_complete() {
        let mut timer = CountdownTimer::default();
        assert_eq!(timer.duration(), 0.0);
        assert!(timer.is_complete());

        timer.start(1000.0);
        assert!(!timer.is_complete());
    }

    #[test]
    fn reads_do_not_drift() {
        let (clock, mut timer) = manual_timer(0.0, 8.0);
        clock.advance(2.0);
        let readings: Vec<f32> =
            (0..5).map(|_| timer.normalized_progress()).collect();
        assert!(readings.iter().all(|r| *r == 0.25));
    }

    #[test]
    fn run_each_steps_until_complete() {
        let (clock, mut timer) = manual_timer(0.0, 1.0);
        // Elapsed time before the run is discarded by the restart.
        clock.advance(0.75);

        let mut steps = Vec::new();
        let mut run = timer.run_each(|t| steps.push(t.elapsed()));
        assert_eq!(run.next(), Some(()));
        clock.advance(0.5);
        assert_eq!(run.next(), Some(()));
        clock.advance(0.5);
        assert_eq!(run.next(), None);
        clock.advance(0.5);
        assert_eq!(run.next(), None);
        drop(run);

        assert_eq!(steps, vec![0.0, 0.5]);
        assert!(timer.is_complete());
    }

    #[test]
    fn run_each_is_lazy() {
        let (clock, mut timer) = manual_timer(0.0, 1.0);
        clock.advance(2.0);
        {
            let _run = timer.run_each(|_| {});
        }
        assert!(timer.is_complete());
    }

    #[test]
    fn running_timer_is_readable() {
        let (clock, mut timer) = manual_timer(0.0, 2.0);
        clock.advance(5.0);

        let mut each = timer.run_each(|_| {});
        assert_eq!(each.next(), Some(()));
        clock.advance(0.5);
        assert_eq!(each.timer().elapsed(), 0.5);
        assert_eq!(each.timer().remaining(), 1.5);
        assert!(!each.timer().is_complete());
        drop(each);

        let mut then = timer.run_then(|_| {});
        assert_eq!(then.next(), Some(()));
        clock.advance(1.0);
        assert_eq!(then.timer().elapsed(), 1.0);
        clock.advance(1.0);
        assert!(then.timer().is_complete());
        assert_eq!(then.next(), None);
    }

    #[test]
    fn run_then_calls_completion_once() {
        let (clock, mut timer) = manual_timer(0.0, 1.0);
        let mut calls = 0;
        let mut run = timer.run_then(|t| {
            calls += 1;
            assert!(t.is_complete());
        });
        assert_eq!(run.next(), Some(()));
        assert_eq!(run.next(), Some(()));
        clock.advance(1.0);
        assert_eq!(run.next(), None);
        assert_eq!(run.next(), None);
        drop(run);
        assert_eq!(calls, 1);
    }

    #[test]
    fn each_run_restarts() {
        let (clock, mut timer) = manual_timer(0.0, 1.0);
        let frames = {
            let mut run = timer.run_then(|_| {});
            let mut frames = 0;
            while run.next().is_some() {
                frames += 1;
                clock.advance(0.25);
            }
            frames
        };
        assert_eq!(frames, 4);

        // A finished timer runs a full countdown again.
        assert!(timer.is_complete());
        let mut run = timer.run_then(|_| {});
        assert_eq!(run.next(), Some(()));
    }
}
