#![forbid(unsafe_code)]

//! Live drag offset for one dismiss gesture.
//!
//! [`DragTracker`] holds the raw pointer displacement since the gesture was
//! granted. Nothing is smoothed and no velocity is estimated: `update`
//! overwrites the offset with the displacement it is given.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --begin--> Tracking --update*--> Tracking
//! Tracking --release_to_rest--> Returning --tick (spring settles)--> Idle
//! Tracking --finish--> Idle        (offset kept where the drag ended)
//! any --reset--> Idle              (offset 0)
//! ```
//!
//! # Invariants
//!
//! 1. `begin` always starts from offset 0.
//! 2. Only the vertical offset is animated back; the horizontal offset is
//!    zeroed when the return starts.
//! 3. `tick` reports settlement exactly once per return.

use std::time::Duration;

use crate::animation::{Animation, Spring};
use crate::config::SpringConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Tracking,
    Returning,
}

/// Drag offset owned by one overlay.
#[derive(Debug, Clone)]
pub struct DragTracker {
    dx: f64,
    dy: f64,
    state: DragState,
    spring: Spring,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DragTracker {
    #[must_use]
    pub fn new() -> Self {
        let mut spring = Spring::new(0.0, 0.0);
        spring.snap_to(0.0);
        Self {
            dx: 0.0,
            dy: 0.0,
            state: DragState::Idle,
            spring,
        }
    }

    /// Start a gesture: offset back to 0, any running return abandoned.
    pub fn begin(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
        self.spring.snap_to(0.0);
        self.state = DragState::Tracking;
    }

    /// Record the displacement since the gesture began.
    ///
    /// Ignored unless a gesture is being tracked.
    pub fn update(&mut self, dx: f64, dy: f64) {
        if self.state == DragState::Tracking {
            self.dx = dx;
            self.dy = dy;
        }
    }

    /// Animate the vertical offset back to 0 with a spring built from
    /// `config`, starting where the drag currently is.
    pub fn release_to_rest(&mut self, config: &SpringConfig) {
        self.spring = Spring::from_config(self.dy, 0.0, config);
        self.dx = 0.0;
        self.state = DragState::Returning;
    }

    /// End tracking and leave the offset where the drag ended.
    pub fn finish(&mut self) {
        self.state = DragState::Idle;
    }

    /// Jump to offset 0 and stop any return in flight.
    ///
    /// Returns `true` if a return was interrupted.
    pub fn reset(&mut self) -> bool {
        let interrupted = self.state == DragState::Returning;
        self.dx = 0.0;
        self.dy = 0.0;
        self.spring.snap_to(0.0);
        self.state = DragState::Idle;
        interrupted
    }

    /// Advance the return spring. Returns `true` on the frame it settles.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.state != DragState::Returning {
            return false;
        }
        self.spring.tick(dt);
        self.dy = self.spring.value();
        if self.spring.is_complete() {
            self.dy = 0.0;
            self.state = DragState::Idle;
            return true;
        }
        false
    }

    /// Horizontal displacement.
    #[inline]
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Vertical displacement; the live value the overlay renders from.
    #[inline]
    #[must_use]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.state == DragState::Tracking
    }

    #[inline]
    #[must_use]
    pub fn is_returning(&self) -> bool {
        self.state == DragState::Returning
    }
}
