//! Time sources for timers

use std::sync::{Arc, OnceLock};

use bevy_ecs::prelude::*;
use bevy_utils::Instant;
use derive_more::derive::{Deref, DerefMut};
use parking_lot::Mutex;

/// A time source: returns the current time in seconds.
///
/// Only differences between readings matter, so the epoch is arbitrary.
pub type Clock = Box<dyn Fn() -> f32 + Send + Sync>;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed on the process-wide monotonic clock.
///
/// The epoch is the first time any wall clock reading is taken.
///
/// Readings are `f32`, so precision degrades as uptime grows: after about
/// a day and a half the step between readings is around 15ms, which is
/// coarse for short cooldowns. Use a [`ManualClock`] or [`FrameClock`]
/// that you reset if that matters.
pub fn wall_clock_secs() -> f32 {
    let epoch = EPOCH.get_or_init(Instant::now);
    epoch.elapsed().as_secs_f32()
}

/// The default [`Clock`], reading real time.
pub fn wall_clock() -> Clock {
    Box::new(wall_clock_secs)
}

/// A clock that only moves when told to.
///
/// Clones share the same reading. Hand a [`source`](Self::source) to a
/// timer and keep a clone around to drive it, e.g. from tests or from an
/// engine's frame time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f32>>,
}

impl ManualClock {
    /// Create a clock reading `start` seconds.
    pub fn new(start: f32) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// The current reading.
    pub fn now(&self) -> f32 {
        *self.now.lock()
    }

    /// Overwrite the current reading.
    pub fn set(&self, secs: f32) {
        *self.now.lock() = secs;
    }

    /// Move the reading forward by `secs`.
    pub fn advance(&self, secs: f32) {
        *self.now.lock() += secs;
    }

    /// A time source that follows this clock.
    pub fn source(&self) -> impl Fn() -> f32 + Send + Sync + 'static {
        let clock = self.clone();
        move || clock.now()
    }
}

/// Resource holding a [`ManualClock`] that follows the engine's frame time.
///
/// [`ProgressBarsPlugin`](crate::ProgressBarsPlugin) sets it to
/// `Time::elapsed_secs()` every frame. Use [`FrameClock::source`] for
/// timers that should run on game time rather than real time.
#[derive(Resource, Debug, Clone, Default)]
#[derive(Deref, DerefMut)]
pub struct FrameClock(pub ManualClock);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(100.0);
        let other = clock.clone();
        let source = clock.source();

        other.advance(2.5);
        assert_eq!(clock.now(), 102.5);
        assert_eq!(source(), 102.5);

        clock.set(7.0);
        assert_eq!(other.now(), 7.0);
        assert_eq!(source(), 7.0);
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = wall_clock();
        let a = clock();
        let b = clock();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn frame_clock_derefs_to_manual_clock() {
        let frame = FrameClock::default();
        let source = frame.source();
        frame.set(3.0);
        assert_eq!(source(), 3.0);
    }
}
