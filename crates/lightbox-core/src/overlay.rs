#![forbid(unsafe_code)]

//! The lightbox state machine.
//!
//! [`Lightbox`] owns the open/close progress spring, the drag tracker and
//! the close target, and is the only component with externally visible side
//! effects: lifecycle callbacks, status bar visibility and back-button
//! registration.
//!
//! # State Machine
//!
//! ```text
//! Closed --open--> Opening --settled--> Open
//! Open --grant--> Panning --release (|dy| <= threshold), settled--> Open
//!                 Panning --release (|dy| > threshold)--> Closing
//! any --close--> Closing --settled--> Closed
//! ```
//!
//! The host drives time: call [`Lightbox::tick`] once per display frame, then
//! sample [`Lightbox::frame`]. Completions fire from inside `tick`, drag
//! return first, then progress.
//!
//! # Invariants
//!
//! 1. At most one of Opening/Closing is in flight (`is_animating`).
//! 2. No gesture is granted while `is_animating` or with swipe-to-dismiss off.
//! 3. `on_hit_close` fires when closing starts, `on_close` when it settles;
//!    each exactly once per close.
//! 4. Starting a transition supersedes the one in flight; the superseded
//!    completion never fires.
//! 5. `open`/`close` settle any drag return immediately, so `is_panning`
//!    cannot outlive the gesture that set it.
//! 6. The back handler is registered at most once and is unregistered by
//!    the time the overlay is Closed.

use std::time::Duration;

use tracing::{debug, debug_span, trace};

use crate::animation::{Animation, Spring};
use crate::config::{ConfigError, LightboxConfig};
use crate::drag::DragTracker;
use crate::geometry::{self, Rect, Size, Target};
use crate::gesture::{ClaimQuery, GestureArbiter, GestureEvent, ReleaseDecision};
use crate::header::HeaderLayout;
use crate::platform::{
    BackButtonRegistry, BackPress, NoBackButton, NoStatusBar, OverlayId, StatusBarController,
    StatusBarTransition,
};

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Lifecycle callbacks.
///
/// `on_hit_close` is required: the owner uses it to clear its open intent.
pub trait LightboxListener {
    /// Closing has started (button, back press, confirm or dismiss drag).
    fn on_hit_close(&mut self);

    /// The close animation settled.
    fn on_close(&mut self) {}

    /// The open animation settled.
    fn on_open(&mut self) {}

    /// The confirm control was pressed; closing follows immediately.
    fn on_confirm(&mut self) {}

    /// Whether the default header should offer a confirm control.
    fn has_confirm(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Observable phase, derived from the internal flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPhase {
    Closed,
    Opening,
    Open,
    Panning,
    Closing,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    /// Content rectangle, including the drag shift while panning.
    pub content: Rect,
    /// Opacity for the scrim and the header.
    pub scrim_opacity: f64,
    /// Raw progress value.
    pub progress: f64,
    /// Vertical drag offset currently applied to `content`.
    pub drag_offset: f64,
    pub phase: OverlayPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Opening,
    Closing,
}

// ---------------------------------------------------------------------------
// Lightbox
// ---------------------------------------------------------------------------

/// Lightbox overlay state machine.
pub struct Lightbox {
    id: OverlayId,
    config: LightboxConfig,
    screen: Size,
    arbiter: GestureArbiter,

    // Flags
    open_intent: bool,
    is_animating: bool,
    is_panning: bool,
    back_registered: bool,

    // Animated values
    progress: Spring,
    transition: Option<Transition>,
    resting: OverlayPhase,
    target: Target,
    drag: DragTracker,
    last_phase: OverlayPhase,

    // Collaborators
    listener: Box<dyn LightboxListener>,
    status_bar: Box<dyn StatusBarController>,
    back_buttons: Box<dyn BackButtonRegistry>,
}

impl std::fmt::Debug for Lightbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lightbox")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("progress", &self.progress.position())
            .field("drag_offset", &self.drag.dy())
            .field("target", &self.target)
            .field("open_intent", &self.open_intent)
            .finish()
    }
}

impl Lightbox {
    /// Create a closed overlay.
    ///
    /// The config is validated first. Status bar and back button default to
    /// no-ops; attach real ones with [`with_status_bar`](Self::with_status_bar)
    /// and [`with_back_buttons`](Self::with_back_buttons).
    pub fn new(
        config: LightboxConfig,
        screen: Size,
        listener: impl LightboxListener + 'static,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let mut progress = Spring::from_config(0.0, 0.0, &config.spring);
        progress.snap_to(0.0);
        let arbiter = GestureArbiter::new(config.swipe_to_dismiss, config.dismiss_threshold);
        let id = OverlayId::next();
        debug!(%id, platform = ?config.platform, swipe = config.swipe_to_dismiss, "lightbox created");

        Ok(Self {
            id,
            open_intent: config.is_open,
            config,
            screen,
            arbiter,
            is_animating: false,
            is_panning: false,
            back_registered: false,
            progress,
            transition: None,
            resting: OverlayPhase::Closed,
            target: Target::FULL_SCREEN,
            drag: DragTracker::new(),
            last_phase: OverlayPhase::Closed,
            listener: Box::new(listener),
            status_bar: Box::new(NoStatusBar),
            back_buttons: Box::new(NoBackButton),
        })
    }

    #[must_use]
    pub fn with_status_bar(mut self, status_bar: impl StatusBarController + 'static) -> Self {
        self.status_bar = Box::new(status_bar);
        self
    }

    #[must_use]
    pub fn with_back_buttons(mut self, registry: impl BackButtonRegistry + 'static) -> Self {
        self.back_buttons = Box::new(registry);
        self
    }

    /// Act on the initial open intent from the config.
    pub fn mount(&mut self) {
        if self.open_intent {
            self.open();
        }
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Feed the owner's open intent. Only a false-to-true edge does anything.
    pub fn set_open_intent(&mut self, open: bool) {
        let was = self.open_intent;
        self.open_intent = open;
        trace!(id = %self.id, was, now = open, "open intent");
        if open && !was && self.transition != Some(Transition::Opening) {
            self.open();
        }
    }

    /// Start opening from wherever progress currently is.
    pub fn open(&mut self) {
        let _span = debug_span!("lightbox.open", id = %self.id).entered();

        self.status_bar.set_hidden(true, StatusBarTransition::Fade);
        if self.config.platform.has_hardware_back() && !self.back_registered {
            self.back_buttons.register(self.id);
            self.back_registered = true;
        }

        self.settle_drag();
        self.target = Target::FULL_SCREEN;
        self.start_transition(Transition::Opening, 1.0);
    }

    /// Start closing toward the current target.
    ///
    /// Fires `on_hit_close` before anything else.
    pub fn close(&mut self) {
        let _span = debug_span!("lightbox.close", id = %self.id).entered();

        self.listener.on_hit_close();
        self.status_bar.set_hidden(false, StatusBarTransition::Fade);
        self.settle_drag();
        self.start_transition(Transition::Closing, 0.0);
    }

    /// Offer a hardware back press.
    pub fn handle_back_press(&mut self) -> BackPress {
        if !self.open_intent {
            trace!(id = %self.id, "back press ignored, not open");
            return BackPress::NotHandled;
        }
        self.unregister_back();
        self.close();
        BackPress::Handled
    }

    /// Close button in the header.
    pub fn press_close(&mut self) {
        self.close();
    }

    /// Confirm button in the header: `on_confirm`, then close.
    ///
    /// Returns `false` without side effects if the listener has no confirm.
    pub fn press_confirm(&mut self) -> bool {
        if !self.listener.has_confirm() {
            return false;
        }
        self.listener.on_confirm();
        self.close();
        true
    }

    // -- Frame driving ------------------------------------------------------

    /// Advance both animated values by `dt` and deliver completions.
    pub fn tick(&mut self, dt: Duration) {
        if self.drag.tick(dt) {
            debug!(id = %self.id, "drag returned to rest");
            self.is_panning = false;
        }

        if self.transition.is_some() {
            self.progress.tick(dt);
            if self.progress.is_complete() {
                self.finish_transition();
            }
        }

        self.sync_phase();
    }

    /// Whether the host should keep requesting frames.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.is_animating || self.drag.is_returning()
    }

    /// Sample the geometry for the current state.
    #[must_use]
    pub fn frame(&self) -> OverlayFrame {
        let placement = geometry::interpolate(
            self.progress.position(),
            self.config.origin,
            self.target,
            self.screen,
            self.config.platform.status_bar_offset(),
        );

        let (content, scrim_opacity, drag_offset) = if self.is_panning {
            let dy = self.drag.dy();
            (
                placement.rect.offset_y(dy),
                geometry::drag_opacity(dy, self.screen.height),
                dy,
            )
        } else {
            (placement.rect, placement.scrim_opacity, 0.0)
        };

        OverlayFrame {
            content,
            scrim_opacity,
            progress: self.progress.position(),
            drag_offset,
            phase: self.phase(),
        }
    }

    // -- Gestures -----------------------------------------------------------

    /// Answer a responder claim query.
    #[must_use]
    pub fn should_claim(&self, query: ClaimQuery) -> bool {
        self.arbiter.should_claim(query, self.is_animating)
    }

    /// Another responder wants the stream. Always granted; an active drag
    /// springs back as if it had been released under the threshold.
    pub fn request_termination(&mut self) -> bool {
        let allowed = self.arbiter.allow_termination();
        if allowed {
            self.handle_gesture(GestureEvent::Terminate);
        }
        allowed
    }

    /// Feed one responder event. Returns whether the overlay consumed it.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> bool {
        let consumed = match event {
            GestureEvent::Grant => {
                if !self.should_claim(ClaimQuery::Start) {
                    trace!(id = %self.id, animating = self.is_animating, "grant refused");
                    return false;
                }
                self.drag.begin();
                self.is_panning = true;
                true
            }
            GestureEvent::Move { dx, dy } => {
                if !self.drag.is_tracking() {
                    return false;
                }
                self.drag.update(dx, dy);
                true
            }
            GestureEvent::Release { dx, dy } => {
                if !self.drag.is_tracking() {
                    return false;
                }
                self.drag.update(dx, dy);
                self.release(dx, dy);
                true
            }
            GestureEvent::Terminate => {
                if !self.drag.is_tracking() {
                    return false;
                }
                debug!(id = %self.id, dy = self.drag.dy(), "gesture terminated, returning");
                self.drag.release_to_rest(&self.config.spring);
                true
            }
        };
        self.sync_phase();
        consumed
    }

    fn release(&mut self, dx: f64, dy: f64) {
        match self.arbiter.decide_release(dx, dy, self.screen.height) {
            ReleaseDecision::Dismiss(target) => {
                debug!(id = %self.id, dx, dy, opacity = target.opacity, "drag dismiss");
                self.drag.finish();
                self.is_panning = false;
                self.target = target;
                self.close();
            }
            ReleaseDecision::SnapBack => {
                debug!(id = %self.id, dy, "drag below threshold, returning");
                self.drag.release_to_rest(&self.config.spring);
            }
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        match self.transition {
            Some(Transition::Opening) => OverlayPhase::Opening,
            Some(Transition::Closing) => OverlayPhase::Closing,
            None if self.is_panning => OverlayPhase::Panning,
            None => self.resting,
        }
    }

    /// Open/close progress; 0 closed, 1 open.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress.position()
    }

    /// Drag offset `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn drag_offset(&self) -> (f64, f64) {
        (self.drag.dx(), self.drag.dy())
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    #[inline]
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.is_panning
    }

    #[inline]
    #[must_use]
    pub fn open_intent(&self) -> bool {
        self.open_intent
    }

    #[inline]
    #[must_use]
    pub fn is_back_registered(&self) -> bool {
        self.back_registered
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Update the screen size, e.g. after rotation.
    pub fn set_screen_size(&mut self, screen: Size) {
        self.screen = screen;
    }

    /// Turn drag-to-dismiss on or off. An active drag is not affected.
    pub fn set_swipe_to_dismiss(&mut self, enabled: bool) {
        self.config.swipe_to_dismiss = enabled;
        self.arbiter.set_enabled(enabled);
    }

    #[must_use]
    pub fn header_layout(&self) -> HeaderLayout {
        HeaderLayout::resolve(self.config.custom_header, self.listener.has_confirm())
    }

    // -- Internals ----------------------------------------------------------

    fn start_transition(&mut self, next: Transition, to: f64) {
        if let Some(prev) = self.transition.replace(next) {
            debug!(id = %self.id, superseded = ?prev, by = ?next, "transition superseded");
        }
        self.is_animating = true;
        self.progress.set_target(to);
        self.sync_phase();
    }

    fn finish_transition(&mut self) {
        let Some(done) = self.transition.take() else {
            return;
        };
        self.is_animating = false;
        match done {
            Transition::Opening => {
                self.resting = OverlayPhase::Open;
                self.sync_phase();
                self.listener.on_open();
            }
            Transition::Closing => {
                self.resting = OverlayPhase::Closed;
                self.unregister_back();
                self.sync_phase();
                self.listener.on_close();
            }
        }
    }

    /// Stop any drag in flight and clear `is_panning`.
    fn settle_drag(&mut self) {
        let interrupted = self.drag.reset();
        if interrupted || self.is_panning {
            debug!(id = %self.id, "drag settled by transition");
        }
        self.is_panning = false;
    }

    fn unregister_back(&mut self) {
        if self.back_registered {
            self.back_buttons.unregister(self.id);
            self.back_registered = false;
        }
    }

    fn sync_phase(&mut self) {
        let phase = self.phase();
        if phase != self.last_phase {
            debug!(id = %self.id, from = ?self.last_phase, to = ?phase, "phase");
            self.last_phase = phase;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
