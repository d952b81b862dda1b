#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Animations do not own a clock. The host advances them with
//! [`Animation::tick`] once per display frame and samples the current value
//! afterwards, which keeps every run deterministic for a given sequence of
//! frame deltas.

pub mod spring;

use std::time::Duration;

pub use spring::Spring;

/// A value that evolves over time when ticked.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled and will not move without new input.
    fn is_complete(&self) -> bool;

    /// Current value.
    fn value(&self) -> f64;

    /// Return to the initial state.
    fn reset(&mut self);
}
