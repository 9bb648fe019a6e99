//! Normalized Progress Values
//!
//! This crate provides small value types that answer "how far along is
//! this?" as a number in the `0.0..=1.0` range, plus "is it done?" as a
//! `bool`. They are meant to drive UI elements such as cooldown bars,
//! health bars, or countdown timers.
//!
//! All of them implement the [`ProgressValue`] trait, so UI code can treat
//! any progress source the same way:
//!
//!  - [`ProgressBar`]: stores its current value; set it whenever it changes.
//!  - [`CountdownTimer`]: computes its current value from a clock, so it
//!    never needs to be ticked.
//!  - [`ChargeMeter`]: filled up by explicit charges, optionally draining
//!    over time.
//!
//! ```rust
//! # use progress_bars::prelude::*;
//!     let mut cooldown = CountdownTimer::new(1.5);
//!     // every frame:
//!     let fill = cooldown.inverse();
//!     let ready = cooldown.is_complete();
//! ```
//!
//! The types are plain values and can be used anywhere. They are also
//! Bevy components, and the optional [`ProgressBarsPlugin`] feeds the
//! engine's `Time` into them:
//!
//! ```rust,ignore
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ProgressBarsPlugin::new())
//!         // ...
//!         .run();
//! ```

#![warn(missing_docs)]

/// All the public API offered by this crate
pub mod prelude {
    pub use crate::charge::*;
    pub use crate::clock::*;
    #[cfg(feature = "debug")]
    pub use crate::debug::ProgressDebug;
    pub use crate::error::*;
    pub use crate::plugin::*;
    pub use crate::progress::*;
    pub use crate::timer::*;
}

pub use crate::prelude::*;

mod charge;
mod clock;
#[cfg(feature = "debug")]
mod debug;
mod error;
mod plugin;
mod progress;
mod timer;
