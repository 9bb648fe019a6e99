use bevy_ecs::prelude::*;

use crate::error::ProgressError;

/// How the raw `current / target` ratio is mapped to normalized progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalization {
    /// Clamp the ratio into the `0.0..=1.0` range.
    #[default]
    Clamp,
    /// Clamp the ratio, then ease it with [`smoothstep`].
    ///
    /// Out-of-range ratios saturate at `0.0` or `1.0`.
    SmoothClamp,
    /// Pass the ratio through as is. May be negative or exceed `1.0`.
    Unlimited,
}

impl Normalization {
    /// Map a raw ratio according to this policy.
    ///
    /// `NaN` passes through every policy unchanged.
    pub fn apply(self, raw: f32) -> f32 {
        match self {
            Normalization::Clamp => raw.clamp(0.0, 1.0),
            Normalization::SmoothClamp => smoothstep(raw),
            Normalization::Unlimited => raw,
        }
    }
}

/// Cubic Hermite easing over the unit interval: `3t² - 2t³`.
///
/// The input is clamped to `0.0..=1.0` first, so the output is always in
/// that range too.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// The state every progress value carries, regardless of how its current
/// value is produced.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ProgressState {
    /// The value representing 100% progress.
    pub target: f32,
    /// How the ratio is normalized.
    pub normalization: Normalization,
    /// Sticky completion flag. Once set, the value counts as complete
    /// until it is restarted.
    pub reached: bool,
}

impl ProgressState {
    /// Create the state for a given target, with default normalization.
    pub fn new(target: f32) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }
}

/// Common interface of everything that represents "how far along" something
/// is.
///
/// Implementors provide the [`ProgressState`] and their current value; all
/// the derived readings (normalized progress, inverse, midway, completion)
/// come for free.
///
/// Reading progress takes `&mut self`, because some implementors (like
/// [`ChargeMeter`](crate::ChargeMeter)) update themselves as a side effect
/// of being read.
pub trait ProgressValue {
    /// Shared state (target, normalization, completion flag).
    fn state(&self) -> &ProgressState;

    /// Shared state (target, normalization, completion flag).
    fn state_mut(&mut self) -> &mut ProgressState;

    /// The current value, without any read side effects.
    fn current_value(&self) -> f32;

    /// Reset the current value to the start. Called by
    /// [`restart`](Self::restart).
    fn reset_value(&mut self);

    /// Hook called right before normalized progress is computed.
    fn update_on_read(&mut self) {}

    /// The value representing 100% progress.
    fn target_value(&self) -> f32 {
        self.state().target
    }

    /// The configured normalization policy.
    fn normalization(&self) -> Normalization {
        self.state().normalization
    }

    /// Change the normalization policy.
    fn set_normalization(&mut self, normalization: Normalization) {
        self.state_mut().normalization = normalization;
    }

    /// Builder-style variant of [`set_normalization`](Self::set_normalization).
    fn with_normalization(mut self, normalization: Normalization) -> Self
    where
        Self: Sized,
    {
        self.set_normalization(normalization);
        self
    }

    /// The raw `current / target` ratio.
    ///
    /// Not guarded against a zero target: follows IEEE float semantics
    /// (`NaN` for `0/0`, infinity otherwise).
    fn ratio(&self) -> f32 {
        self.current_value() / self.target_value()
    }

    /// The ratio mapped through the normalization policy.
    fn normalized_progress(&mut self) -> f32 {
        self.update_on_read();
        self.normalization().apply(self.ratio())
    }

    /// Like [`normalized_progress`](Self::normalized_progress), but refuses
    /// to divide by a zero or non-finite target.
    fn try_normalized_progress(&mut self) -> Result<f32, ProgressError> {
        let target = self.target_value();
        if !target.is_finite() {
            return Err(ProgressError::NonFiniteTarget(target));
        }
        if target == 0.0 {
            return Err(ProgressError::ZeroTarget);
        }
        Ok(self.normalized_progress())
    }

    /// `1 - normalized_progress()`. Counts down instead of up.
    fn inverse(&mut self) -> f32 {
        1.0 - self.normalized_progress()
    }

    /// Triangle wave over the progress: 0 at both ends, 1 at the half way
    /// point.
    ///
    /// Useful for effects that should ramp up and then back down.
    fn midway(&mut self) -> f32 {
        let p = self.normalized_progress();
        if p < 0.5 {
            p * 2.0
        } else {
            (1.0 - p) * 2.0
        }
    }

    /// Returns true if explicitly finished or the current value has reached
    /// the target.
    fn is_complete(&self) -> bool {
        self.state().reached || self.current_value() >= self.target_value()
    }

    /// Mark as complete, without touching the current value.
    fn finish(&mut self) {
        self.state_mut().reached = true;
    }

    /// Go back to the start and clear the completion flag.
    fn restart(&mut self) {
        self.reset_value();
        self.state_mut().reached = false;
    }
}

/// A progress value whose current value is simply stored.
///
/// This is the plain "bar": set the current value whenever it changes
/// and read the normalized progress when drawing.
///
/// Reads have no side effects, so you can also convert it into `f32`
/// (normalized progress) or `bool` (completion).
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    state: ProgressState,
    current: f32,
}

impl ProgressBar {
    /// Create an empty bar with the given target.
    pub fn new(target: f32) -> Self {
        Self {
            state: ProgressState::new(target),
            current: 0.0,
        }
    }

    /// Builder-style method to set the current value.
    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current;
        self
    }

    /// Overwrite the current value. It is stored as given, not clamped.
    pub fn set_current(&mut self, current: f32) {
        self.current = current;
    }

    /// Change the target value.
    pub fn set_target(&mut self, target: f32) {
        self.state.target = target;
    }
}

impl ProgressValue for ProgressBar {
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
}

impl From<ProgressBar> for f32 {
    fn from(mut bar: ProgressBar) -> f32 {
        bar.normalized_progress()
    }
}

impl From<ProgressBar> for bool {
    fn from(bar: ProgressBar) -> bool {
        bar.is_complete()
    }
}
