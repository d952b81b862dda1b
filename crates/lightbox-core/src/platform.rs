#![forbid(unsafe_code)]

//! Host platform traits and identifiers.
//!
//! The overlay touches two pieces of process-wide platform state: the system
//! status bar and the hardware back button. Both are reached through traits
//! so the host decides what they do and tests can record the calls.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

/// Vertical compensation applied on Android, where the status bar is hidden
/// while the overlay is presented.
pub const ANDROID_STATUS_BAR_OFFSET: f64 = -25.0;

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "lowercase"))]
pub enum Platform {
    #[default]
    Ios,
    Android,
    /// Any host without a status bar or hardware back button.
    Other,
}

impl Platform {
    /// Offset added to every vertical placement.
    #[must_use]
    pub const fn status_bar_offset(self) -> f64 {
        match self {
            Self::Android => ANDROID_STATUS_BAR_OFFSET,
            Self::Ios | Self::Other => 0.0,
        }
    }

    /// Whether the platform has a hardware back button to intercept.
    #[must_use]
    pub const fn has_hardware_back(self) -> bool {
        matches!(self, Self::Android)
    }
}

/// How the status bar visibility change is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBarTransition {
    None,
    Fade,
}

/// Shows and hides the system status bar.
pub trait StatusBarController {
    fn set_hidden(&mut self, hidden: bool, transition: StatusBarTransition);
}

/// Process-wide registry of hardware back handlers.
///
/// The overlay registers its [`OverlayId`] while open. When the user presses
/// back, the host calls [`Lightbox::handle_back_press`] on the most recently
/// registered overlay and stops propagation if it reports
/// [`BackPress::Handled`].
///
/// [`Lightbox::handle_back_press`]: crate::overlay::Lightbox::handle_back_press
pub trait BackButtonRegistry {
    fn register(&mut self, id: OverlayId);
    fn unregister(&mut self, id: OverlayId);
}

/// Result of offering a back press to an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackPress {
    /// The overlay consumed the press and started closing.
    Handled,
    /// The press should propagate to the next handler.
    NotHandled,
}

impl BackPress {
    #[must_use]
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one overlay instance, used as the back-handler key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocate a fresh id, unique within the process.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// Status bar controller for hosts without a status bar.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStatusBar;

impl StatusBarController for NoStatusBar {
    fn set_hidden(&mut self, _hidden: bool, _transition: StatusBarTransition) {}
}

/// Back registry for hosts without a hardware back button.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBackButton;

impl BackButtonRegistry for NoBackButton {
    fn register(&mut self, _id: OverlayId) {}
    fn unregister(&mut self, _id: OverlayId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_android_offsets() {
        assert_eq!(Platform::Android.status_bar_offset(), -25.0);
        assert_eq!(Platform::Ios.status_bar_offset(), 0.0);
        assert_eq!(Platform::Other.status_bar_offset(), 0.0);
    }

    #[test]
    fn only_android_has_back() {
        assert!(Platform::Android.has_hardware_back());
        assert!(!Platform::Ios.has_hardware_back());
        assert!(!Platform::Other.has_hardware_back());
    }

    #[test]
    fn ids_are_unique() {
        let a = OverlayId::next();
        let b = OverlayId::next();
        assert_ne!(a, b);
        assert!(b > a);
        assert_eq!(format!("{a}"), format!("overlay#{}", a.get()));
    }
}
