#![forbid(unsafe_code)]

//! Recording fixtures for the lightbox collaborators.
//!
//! Every fixture appends to one shared [`EventLog`], so a test can assert
//! the exact interleaving of callbacks, status bar changes and back-button
//! registration.

use std::cell::RefCell;
use std::rc::Rc;

use lightbox_core::platform::StatusBarTransition;
use lightbox_core::{
    BackButtonRegistry, ConfigError, Lightbox, LightboxConfig, LightboxListener, OverlayId, Size,
    StatusBarController,
};

/// One observed side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recorded {
    HitClose,
    Close,
    Open,
    Confirm,
    StatusBarHidden(bool),
    BackRegistered(OverlayId),
    BackUnregistered(OverlayId),
}

impl Recorded {
    /// Stable name for JSONL output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::HitClose => "hit_close",
            Self::Close => "close",
            Self::Open => "open",
            Self::Confirm => "confirm",
            Self::StatusBarHidden(true) => "status_bar_hidden",
            Self::StatusBarHidden(false) => "status_bar_shown",
            Self::BackRegistered(_) => "back_registered",
            Self::BackUnregistered(_) => "back_unregistered",
        }
    }
}

/// Shared, ordered log of side effects. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Rc<RefCell<Vec<Recorded>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Recorded) {
        self.inner.borrow_mut().push(event);
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Recorded> {
        self.inner.borrow().clone()
    }

    /// How many times `event` was recorded.
    #[must_use]
    pub fn count(&self, event: Recorded) -> usize {
        self.inner.borrow().iter().filter(|e| **e == event).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }
}

/// Listener that records every callback.
#[derive(Debug, Clone)]
pub struct RecordingListener {
    log: EventLog,
    confirm: bool,
}

impl RecordingListener {
    #[must_use]
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            confirm: false,
        }
    }

    /// Also offer a confirm control.
    #[must_use]
    pub fn with_confirm(mut self) -> Self {
        self.confirm = true;
        self
    }
}

impl LightboxListener for RecordingListener {
    fn on_hit_close(&mut self) {
        self.log.push(Recorded::HitClose);
    }

    fn on_close(&mut self) {
        self.log.push(Recorded::Close);
    }

    fn on_open(&mut self) {
        self.log.push(Recorded::Open);
    }

    fn on_confirm(&mut self) {
        self.log.push(Recorded::Confirm);
    }

    fn has_confirm(&self) -> bool {
        self.confirm
    }
}

/// Status bar that records visibility changes.
#[derive(Debug, Clone)]
pub struct RecordingStatusBar {
    log: EventLog,
}

impl RecordingStatusBar {
    #[must_use]
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl StatusBarController for RecordingStatusBar {
    fn set_hidden(&mut self, hidden: bool, _transition: StatusBarTransition) {
        self.log.push(Recorded::StatusBarHidden(hidden));
    }
}

/// Back registry that records calls and keeps the registration stack.
///
/// The stack is shared between clones so a test can keep a handle and ask
/// which overlay a back press would go to.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackButtons {
    log: EventLog,
    stack: Rc<RefCell<Vec<OverlayId>>>,
}

impl RecordingBackButtons {
    #[must_use]
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            stack: Rc::default(),
        }
    }

    /// Overlay that should receive the next back press.
    #[must_use]
    pub fn top(&self) -> Option<OverlayId> {
        self.stack.borrow().last().copied()
    }

    #[must_use]
    pub fn registered(&self) -> Vec<OverlayId> {
        self.stack.borrow().clone()
    }
}

impl BackButtonRegistry for RecordingBackButtons {
    fn register(&mut self, id: OverlayId) {
        self.stack.borrow_mut().push(id);
        self.log.push(Recorded::BackRegistered(id));
    }

    fn unregister(&mut self, id: OverlayId) {
        self.stack.borrow_mut().retain(|other| *other != id);
        self.log.push(Recorded::BackUnregistered(id));
    }
}

/// A lightbox wired to recording fixtures.
#[derive(Debug)]
pub struct Fixture {
    pub lightbox: Lightbox,
    pub log: EventLog,
    pub back_buttons: RecordingBackButtons,
}

impl Fixture {
    /// Build a lightbox with recording listener, status bar and back registry.
    pub fn new(config: LightboxConfig, screen: Size) -> Result<Self, ConfigError> {
        Self::build(config, screen, false)
    }

    /// Same as [`Fixture::new`], with a listener that handles confirm.
    pub fn with_confirm(config: LightboxConfig, screen: Size) -> Result<Self, ConfigError> {
        Self::build(config, screen, true)
    }

    fn build(config: LightboxConfig, screen: Size, confirm: bool) -> Result<Self, ConfigError> {
        let log = EventLog::new();
        let mut listener = RecordingListener::new(log.clone());
        if confirm {
            listener = listener.with_confirm();
        }
        let back_buttons = RecordingBackButtons::new(log.clone());
        let lightbox = Lightbox::new(config, screen, listener)?
            .with_status_bar(RecordingStatusBar::new(log.clone()))
            .with_back_buttons(back_buttons.clone());
        Ok(Self {
            lightbox,
            log,
            back_buttons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbox_core::{Platform, Rect};

    #[test]
    fn clones_share_log() {
        let log = EventLog::new();
        let other = log.clone();
        other.push(Recorded::Open);
        assert_eq!(log.snapshot(), vec![Recorded::Open]);
        assert_eq!(log.count(Recorded::Open), 1);
        log.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn back_stack_tracks_registration() {
        let log = EventLog::new();
        let mut registry = RecordingBackButtons::new(log.clone());
        let handle = registry.clone();
        let (a, b) = (OverlayId::next(), OverlayId::next());
        registry.register(a);
        registry.register(b);
        assert_eq!(handle.top(), Some(b));
        registry.unregister(b);
        assert_eq!(handle.top(), Some(a));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn fixture_records_open() {
        let config =
            LightboxConfig::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_platform(Platform::Android);
        let mut fx = Fixture::new(config, Size::new(100.0, 200.0)).unwrap();
        fx.lightbox.set_open_intent(true);
        let id = fx.lightbox.id();
        assert_eq!(
            fx.log.snapshot(),
            vec![Recorded::StatusBarHidden(true), Recorded::BackRegistered(id)]
        );
        assert_eq!(fx.back_buttons.top(), Some(id));
    }

    #[test]
    fn names_are_distinct() {
        let id = OverlayId::next();
        let all = [
            Recorded::HitClose,
            Recorded::Close,
            Recorded::Open,
            Recorded::Confirm,
            Recorded::StatusBarHidden(true),
            Recorded::StatusBarHidden(false),
            Recorded::BackRegistered(id),
            Recorded::BackUnregistered(id),
        ];
        let mut names: Vec<_> = all.iter().map(Recorded::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }
}
