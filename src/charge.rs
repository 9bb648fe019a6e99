use bevy_ecs::prelude::*;

use crate::progress::{ProgressState, ProgressValue};

/// A progress value that is filled up explicitly and drains over time.
///
/// Call [`charge`](Self::charge) to add (or remove) charge. The value is
/// always kept within `0.0..=capacity`.
///
/// If a decay rate is set, the meter loses `decay_per_second * frame_delta`
/// every time its normalized progress is read. The frame delta comes from
/// the host's frame loop: [`ProgressBarsPlugin`](crate::ProgressBarsPlugin)
/// sets it from `Time::delta_secs()` every frame, or you can call
/// [`set_frame_delta`](Self::set_frame_delta) yourself. Reading the progress
/// more than once per frame decays more than once.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct ChargeMeter {
    state: ProgressState,
    current: f32,
    decay_per_second: f32,
    frame_delta: f32,
}

impl ChargeMeter {
    /// Create an empty meter that holds up to `capacity`.
    pub fn new(capacity: f32) -> Self {
        Self {
            state: ProgressState::new(capacity),
            ..Default::default()
        }
    }

    /// Builder-style method to set the decay rate.
    pub fn with_decay(mut self, decay_per_second: f32) -> Self {
        self.decay_per_second = decay_per_second;
        self
    }

    /// Add `amount` of charge. Negative amounts drain the meter.
    pub fn charge(&mut self, amount: f32) {
        self.current = self.clamp_to_capacity(self.current + amount);
    }

    /// The maximum charge.
    pub fn capacity(&self) -> f32 {
        self.state.target
    }

    /// Amount of charge lost per second of frame time.
    pub fn decay_per_second(&self) -> f32 {
        self.decay_per_second
    }

    /// Change the decay rate.
    pub fn set_decay_per_second(&mut self, decay_per_second: f32) {
        self.decay_per_second = decay_per_second;
    }

    /// The frame delta that the next reads will decay by.
    pub fn frame_delta(&self) -> f32 {
        self.frame_delta
    }

    /// Record the duration of the current frame.
    pub fn set_frame_delta(&mut self, delta_secs: f32) {
        self.frame_delta = delta_secs;
    }

    // Written with min/max rather than `f32::clamp`, which panics when
    // the capacity is negative or NaN.
    fn clamp_to_capacity(&self, value: f32) -> f32 {
        value.max(0.0).min(self.state.target)
    }
}

impl ProgressValue for ChargeMeter {
    fn state(&self) -> &ProgressState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProgressState {
        &mut self.state
    }

    fn current_value(&self) -> f32 {
        self.current
    }

    fn reset_value(&mut self) {
        self.current = 0.0;
    }

    fn update_on_read(&mut self) {
        if self.decay_per_second != 0.0 {
            self.current = self.clamp_to_capacity(
                self.current - self.decay_per_second * self.frame_delta,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "left: {}, right: {}", a, b);
    }

    #[test]
    fn overcharge_is_clamped() {
        let mut meter = ChargeMeter::new(10.0);
        meter.charge(15.0);
        assert_eq!(meter.current_value(), 10.0);
        assert!(meter.is_complete());
        assert_eq!(meter.normalized_progress(), 1.0);
    }

    #[test]
    fn never_drains_below_zero() {
        let mut meter = ChargeMeter::new(10.0);
        meter.charge(4.0);
        for _ in 0..5 {
            meter.charge(-1000.0);
            assert_eq!(meter.current_value(), 0.0);
        }
        assert!(!meter.is_complete());
    }

    #[test]
    fn charge_accumulates() {
        let mut meter = ChargeMeter::new(8.0);
        meter.charge(2.0);
        meter.charge(4.0);
        assert_eq!(meter.normalized_progress(), 0.75);
        assert!(!meter.is_complete());
        meter.charge(2.0);
        assert!(meter.is_complete());
    }

    #[test]
    fn decays_on_read() {
        let mut meter = ChargeMeter::new(10.0).with_decay(2.0);
        meter.charge(10.0);
        meter.set_frame_delta(0.5);

        // Completion checks do not decay.
        assert!(meter.is_complete());
        assert_eq!(meter.current_value(), 10.0);

        assert_approx_eq(meter.normalized_progress(), 0.9);
        assert_approx_eq(meter.normalized_progress(), 0.8);
        assert!(!meter.is_complete());
    }

    #[test]
    fn decay_stops_at_empty() {
        let mut meter = ChargeMeter::new(10.0).with_decay(4.0);
        meter.charge(3.0);
        meter.set_frame_delta(1.0);
        assert_eq!(meter.normalized_progress(), 0.0);
        assert_eq!(meter.current_value(), 0.0);
        assert_eq!(meter.inverse(), 1.0);
    }

    #[test]
    fn no_decay_without_frame_time() {
        let mut meter = ChargeMeter::new(10.0).with_decay(4.0);
        meter.charge(5.0);
        assert_eq!(meter.normalized_progress(), 0.5);
        assert_eq!(meter.normalized_progress(), 0.5);
    }

    #[test]
    fn restart_empties() {
        let mut meter = ChargeMeter::new(5.0);
        meter.charge(5.0);
        meter.finish();
        meter.restart();
        assert_eq!(meter.current_value(), 0.0);
        assert!(!meter.is_complete());
        assert_eq!(meter.capacity(), 5.0);
    }
}
