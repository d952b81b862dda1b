#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation.
//!
//! Every motion in the overlay (open, close, drag snap-back) is a spring.
//! The model is the classical damped spring with unit mass:
//!
//!   a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! Springs are usually built from a [`SpringConfig`] expressed as
//! tension/friction, which maps onto stiffness/damping (see
//! [`SpringConfig::stiffness`] and [`SpringConfig::damping`]).
//!
//! # Integration
//!
//! Semi-implicit Euler with steps of at most 4ms. Large frame deltas are
//! subdivided.
//!
//! # Invariants
//!
//! 1. A spring at rest stays put until [`Spring::set_target`] moves the
//!    target (or [`Spring::snap_to`] moves everything).
//! 2. Reaching rest snaps `position` exactly onto `target` and zeroes velocity.
//! 3. A woken spring comes to rest after at most `max_duration` of simulated
//!    time, even if its parameters would let it oscillate longer.
//! 4. Stiffness is always positive and damping never negative.

use std::time::Duration;

use super::Animation;
use crate::config::SpringConfig;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest threshold for position and speed.
const DEFAULT_REST_THRESHOLD: f64 = 0.001;

/// Minimum stiffness to prevent degenerate springs.
const MIN_STIFFNESS: f64 = 0.1;

/// Default upper bound on simulated time before a spring is forced to rest.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(10);

/// A damped harmonic oscillator producing physically-based motion.
///
/// ```ignore
/// use std::time::Duration;
/// use lightbox_core::animation::Spring;
/// use lightbox_core::config::SpringConfig;
///
/// let mut spring = Spring::from_config(0.0, 1.0, &SpringConfig::default());
/// for _ in 0..180 {
///     spring.advance(Duration::from_millis(16));
/// }
/// assert_eq!(spring.position(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    max_duration: Duration,
    elapsed: Duration,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    ///
    /// Parameters default to the lightbox spring (tension 30, friction 7).
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self::from_config(initial, target, &SpringConfig::default())
    }

    /// Create a spring whose stiffness and damping come from `config`.
    #[must_use]
    pub fn from_config(initial: f64, target: f64, config: &SpringConfig) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: config.stiffness().max(MIN_STIFFNESS),
            damping: config.damping().max(0.0),
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_REST_THRESHOLD,
            max_duration: DEFAULT_MAX_DURATION,
            elapsed: Duration::ZERO,
            at_rest: false,
        }
    }

    /// Override the damping coefficient. Negative values become 0.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.max(0.0);
        self
    }

    /// Simulated time after which a woken spring is forced to rest.
    #[must_use]
    pub fn with_max_duration(mut self, max: Duration) -> Self {
        self.max_duration = max;
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Stiffness parameter.
    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Damping parameter.
    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Change the target. Wakes the spring if it was at rest.
    ///
    /// Position and velocity carry over, so retargeting a moving spring
    /// continues the motion instead of restarting it.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
            self.elapsed = Duration::ZERO;
        }
    }

    /// Jump to `value` and stop: position, target and initial all become
    /// `value`, velocity becomes zero.
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.initial = value;
        self.velocity = 0.0;
        self.elapsed = Duration::ZERO;
        self.at_rest = true;
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// One semi-implicit Euler step: velocity first, then position from the
    /// new velocity.
    fn integrate(&mut self, h: f64) {
        let accel = self.stiffness * (self.target - self.position) - self.damping * self.velocity;
        self.velocity += accel * h;
        self.position += self.velocity * h;
    }

    fn near_target(&self) -> bool {
        (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
    }

    fn come_to_rest(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Advance by `dt` of simulated time in sub-steps of at most 4ms.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest || dt.is_zero() {
            return;
        }

        let mut left = dt.as_secs_f64();
        while left > 0.0 {
            let h = left.min(MAX_STEP_SECS);
            self.integrate(h);
            left -= h;
        }
        self.elapsed = self.elapsed.saturating_add(dt);

        if self.near_target() {
            self.come_to_rest();
        } else if self.elapsed >= self.max_duration {
            tracing::debug!(
                target = self.target,
                position = self.position,
                velocity = self.velocity,
                "spring exceeded its settle budget; forcing rest"
            );
            self.come_to_rest();
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Raw position. Lightbox values (progress, drag offset) are not
    /// normalized, so no clamping happens here.
    fn value(&self) -> f64 {
        self.position
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.elapsed = Duration::ZERO;
        self.at_rest = false;
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Spring configurations for lightbox motion.
pub mod presets {
    use crate::config::SpringConfig;

    /// The stock lightbox spring: tension 30, friction 7. Slightly
    /// underdamped, so opening lands with a small bounce.
    #[must_use]
    pub fn lightbox() -> SpringConfig {
        SpringConfig::new(30.0, 7.0)
    }

    /// Quicker, near-critically damped motion.
    #[must_use]
    pub fn snappy() -> SpringConfig {
        SpringConfig::new(80.0, 12.0)
    }

    /// Slow and soft, without visible overshoot.
    #[must_use]
    pub fn gentle() -> SpringConfig {
        SpringConfig::new(20.0, 10.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
