// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: lightbox open/close animation and drag-to-dismiss.
//!
//! # Role
//! `lightbox-core` is the headless half of a lightbox overlay. It animates
//! content from an origin rectangle (say, a thumbnail) to full screen and
//! back, and decides what a vertical drag means. The host renders.
//!
//! # Primary responsibilities
//! - **Lightbox**: the state machine; lifecycle callbacks, status bar and
//!   back-button side effects.
//! - **Geometry**: pure progress-to-rectangle interpolation.
//! - **DragTracker / GestureArbiter**: live drag offset, claim and release
//!   decisions.
//! - **Spring**: frame-driven damped spring used for every motion.
//! - **LightboxConfig**: options, validation, TOML/JSON loading.
//!
//! # How it fits
//! Each display frame the host calls [`overlay::Lightbox::tick`] with the
//! frame delta and draws [`overlay::Lightbox::frame`]. Touch input is fed
//! through [`overlay::Lightbox::handle_gesture`]. `lightbox-harness` drives
//! the same loop deterministically for tests.

pub mod animation;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod gesture;
pub mod header;
pub mod overlay;
pub mod platform;

pub use config::{ConfigError, LightboxConfig, SpringConfig};
pub use geometry::{Rect, Size, Target};
pub use gesture::{ClaimQuery, GestureEvent};
pub use overlay::{Lightbox, LightboxListener, OverlayFrame, OverlayPhase};
pub use platform::{BackButtonRegistry, BackPress, OverlayId, Platform, StatusBarController};
