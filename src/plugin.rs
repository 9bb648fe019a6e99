use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy_time::prelude::*;

use crate::prelude::*;

/// Add this plugin to drive progress values from the engine's clock.
///
/// It is optional: all the progress types work fine on their own. What the
/// plugin does for you, every frame:
///
///  - Set the [`FrameClock`] resource to `Time::elapsed_secs()`, so that
///    [`CountdownTimer`]s created with [`FrameClock::source`] follow game
///    time.
///  - Set the frame delta of every [`ChargeMeter`] component to
///    `Time::delta_secs()`, so that decay is frame-rate independent.
///
/// The `Time` resource must exist (add `TimePlugin`, or `MinimalPlugins`).
/// If it doesn't, the systems do nothing.
///
/// ```rust,ignore
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(ProgressBarsPlugin::new())
///         // ...
///         .run();
/// ```
pub struct ProgressBarsPlugin {
    update_schedule: InternedScheduleLabel,
    sync_frame_clock: bool,
    sync_frame_delta: bool,
}

/// This set contains the systems that feed the engine's time into progress
/// values. Order your systems after it if they read progress in the same
/// schedule (`First` by default).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct ProgressBarsSet;

impl Default for ProgressBarsPlugin {
    fn default() -> Self {
        Self {
            update_schedule: First.intern(),
            sync_frame_clock: true,
            sync_frame_delta: true,
        }
    }
}

impl ProgressBarsPlugin {
    /// Create a new instance of this plugin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure in which schedule to update the frame clock and deltas.
    ///
    /// Default: `First`
    pub fn update_in<L: ScheduleLabel>(mut self, schedule: L) -> Self {
        self.update_schedule = schedule.intern();
        self
    }

    /// Configure whether the [`FrameClock`] resource should follow `Time`.
    ///
    /// Default: `true`.
    pub fn sync_frame_clock(mut self, enabled: bool) -> Self {
        self.sync_frame_clock = enabled;
        self
    }

    /// Configure whether the [`FrameClock`] resource should follow `Time`.
    ///
    /// (Mutable method variant)
    pub fn set_sync_frame_clock(&mut self, enabled: bool) {
        self.sync_frame_clock = enabled;
    }

    /// Configure whether [`ChargeMeter`] components should receive the
    /// frame delta.
    ///
    /// Default: `true`.
    pub fn sync_frame_delta(mut self, enabled: bool) -> Self {
        self.sync_frame_delta = enabled;
        self
    }

    /// Configure whether [`ChargeMeter`] components should receive the
    /// frame delta.
    ///
    /// (Mutable method variant)
    pub fn set_sync_frame_delta(&mut self, enabled: bool) {
        self.sync_frame_delta = enabled;
    }
}

impl Plugin for ProgressBarsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameClock>();
        if self.sync_frame_clock {
            app.add_systems(
                self.update_schedule,
                sync_frame_clock
                    .run_if(resource_exists::<Time>)
                    .in_set(ProgressBarsSet),
            );
        }
        if self.sync_frame_delta {
            app.add_systems(
                self.update_schedule,
                sync_frame_delta
                    .run_if(resource_exists::<Time>)
                    .run_if(any_with_component::<ChargeMeter>)
                    .in_set(ProgressBarsSet),
            );
        }
        #[cfg(feature = "debug")]
        {
            use crate::debug::*;
            use bevy_log::prelude::*;
            app.add_systems(
                self.update_schedule,
                debug_progress
                    .run_if(rc_debug_progress)
                    .after(ProgressBarsSet),
            );
            debug!(
                "Progress bars: clock sync {}, delta sync {}",
                self.sync_frame_clock, self.sync_frame_delta,
            );
        }
    }
}

/// System that sets the [`FrameClock`] to the elapsed game time.
///
/// This `fn` is `pub` so you can order your systems around it.
pub fn sync_frame_clock(time: Res<Time>, clock: Res<FrameClock>) {
    clock.set(time.elapsed_secs());
}

/// System that gives every [`ChargeMeter`] the duration of this frame.
///
/// This `fn` is `pub` so you can order your systems around it.
pub fn sync_frame_delta(time: Res<Time>, mut q: Query<&mut ChargeMeter>) {
    let delta = time.delta_secs();
    for mut meter in &mut q {
        // Only the decay input changed, not the charge itself.
        meter.bypass_change_detection().set_frame_delta(delta);
    }
}
