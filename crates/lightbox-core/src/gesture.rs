#![forbid(unsafe_code)]

//! Gesture ownership and release decisions for drag-to-dismiss.
//!
//! The host delivers touch input as a responder stream: a series of claim
//! queries, then `Grant`, zero or more `Move`, and finally `Release` or
//! `Terminate`. [`GestureArbiter`] answers the claim queries and decides
//! what a release means. It holds no per-gesture state; the overlay owns
//! that.
//!
//! # Invariants
//!
//! 1. Claims are eager: every query kind gets the same answer, independent
//!    of touch position or movement.
//! 2. Nothing is claimed while swipe-to-dismiss is disabled or while an
//!    open/close animation is in flight.
//! 3. Termination requests are always granted.
//! 4. A release dismisses iff `|dy|` strictly exceeds the threshold.

use crate::config::DEFAULT_DISMISS_THRESHOLD;
use crate::geometry::Target;

/// Which responder question the host is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimQuery {
    /// Should the overlay become responder when a touch starts?
    Start,
    /// Same, asked during the capture phase before children.
    StartCapture,
    /// Should the overlay become responder when a touch moves?
    Move,
    /// Same, asked during the capture phase before children.
    MoveCapture,
}

/// One event in the responder stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// The overlay became responder.
    Grant,
    /// Displacement since the touch started.
    Move { dx: f64, dy: f64 },
    /// Touch lifted with the final displacement.
    Release { dx: f64, dy: f64 },
    /// Another responder took over the stream.
    Terminate,
}

/// Outcome of a released drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseDecision {
    /// Close, landing on this target.
    Dismiss(Target),
    /// Spring the drag offset back to 0 and stay open.
    SnapBack,
}

/// Stateless claim/release policy for drag-to-dismiss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureArbiter {
    enabled: bool,
    dismiss_threshold: f64,
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new(false, DEFAULT_DISMISS_THRESHOLD)
    }
}

impl GestureArbiter {
    #[must_use]
    pub const fn new(enabled: bool, dismiss_threshold: f64) -> Self {
        Self {
            enabled,
            dismiss_threshold,
        }
    }

    /// Whether drag-to-dismiss is on.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub const fn dismiss_threshold(&self) -> f64 {
        self.dismiss_threshold
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Answer a claim query.
    #[must_use]
    pub fn should_claim(&self, _query: ClaimQuery, is_animating: bool) -> bool {
        self.enabled && !is_animating
    }

    /// Answer another responder asking to take over. Always yes.
    #[must_use]
    pub fn allow_termination(&self) -> bool {
        true
    }

    /// Decide what a release at `(dx, dy)` means.
    #[must_use]
    pub fn decide_release(&self, dx: f64, dy: f64, screen_height: f64) -> ReleaseDecision {
        if dy.abs() > self.dismiss_threshold {
            ReleaseDecision::Dismiss(Target::from_drag(dx, dy, screen_height))
        } else {
            ReleaseDecision::SnapBack
        }
    }
}
