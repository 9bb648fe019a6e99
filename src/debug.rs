use bevy_ecs::prelude::*;
use bevy_log::prelude::*;

use crate::prelude::*;

/// Use this resource to control the logging of progress values every frame.
///
/// The log messages are at TRACE level.
///
/// Enabled by default when inserted. Nothing is logged if the resource does
/// not exist. Only available if the `debug` cargo feature is enabled.
#[derive(Resource)]
pub struct ProgressDebug {
    /// If true, print trace messages.
    pub enabled: bool,
}

impl Default for ProgressDebug {
    fn default() -> Self {
        Self { enabled: true }
    }
}

pub(crate) fn rc_debug_progress(cfg_debug: Option<Res<ProgressDebug>>) -> bool {
    cfg_debug.map(|cfg| cfg.enabled).unwrap_or(false)
}

// Reads values without side effects: normalized progress would decay meters.
pub(crate) fn debug_progress(
    q_timers: Query<(Entity, &CountdownTimer)>,
    q_meters: Query<(Entity, &ChargeMeter)>,
    q_bars: Query<(Entity, &ProgressBar)>,
) {
    for (e, timer) in &q_timers {
        trace!(
            "Timer {}: {}/{}s, complete: {}",
            e,
            timer.elapsed(),
            timer.duration(),
            timer.is_complete(),
        );
    }
    for (e, meter) in &q_meters {
        trace!(
            "Meter {}: {}/{}, decay: {}/s, complete: {}",
            e,
            meter.current_value(),
            meter.capacity(),
            meter.decay_per_second(),
            meter.is_complete(),
        );
    }
    for (e, bar) in &q_bars {
        trace!(
            "Bar {}: {}/{}, complete: {}",
            e,
            bar.current_value(),
            bar.target_value(),
            bar.is_complete(),
        );
    }
}
