#![forbid(unsafe_code)]

//! Geometric primitives and the open/close interpolator.
//!
//! Everything here is a pure function of its inputs, so the host may sample
//! it every frame without drift.

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

/// A rectangle in host screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `size`.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Translate vertically by `dy`.
    #[inline]
    #[must_use]
    pub fn offset_y(self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// Screen dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Where a close animation lands, and the scrim opacity at full progress.
///
/// The default is the full-screen placement: `{0, 0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

impl Target {
    pub const FULL_SCREEN: Self = Self {
        x: 0.0,
        y: 0.0,
        opacity: 1.0,
    };

    /// Target continuing from a drag that ended at `(dx, dy)`.
    ///
    /// Opacity is `1 - |dy| / screen_height`, clamped to [0, 1]. A
    /// non-positive screen height yields opacity 0.
    #[must_use]
    pub fn from_drag(dx: f64, dy: f64, screen_height: f64) -> Self {
        let opacity = if screen_height > 0.0 {
            (1.0 - dy.abs() / screen_height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            x: dx,
            y: dy,
            opacity,
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::FULL_SCREEN
    }
}

/// Interpolated placement for one progress sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub scrim_opacity: f64,
}

/// Linear interpolation; exact at both ends.
#[inline]
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

/// Map `progress` to the content rectangle and scrim opacity.
///
/// `status_bar_offset` is added to both vertical endpoints. Progress is not
/// clamped, so spring overshoot extrapolates past the endpoints.
#[must_use]
pub fn interpolate(
    progress: f64,
    origin: Rect,
    target: Target,
    screen: Size,
    status_bar_offset: f64,
) -> Placement {
    Placement {
        rect: Rect {
            x: lerp(origin.x, target.x, progress),
            y: lerp(
                origin.y + status_bar_offset,
                target.y + status_bar_offset,
                progress,
            ),
            width: lerp(origin.width, screen.width, progress),
            height: lerp(origin.height, screen.height, progress),
        },
        scrim_opacity: lerp(0.0, target.opacity, progress),
    }
}

/// Scrim opacity while a drag is in progress.
///
/// Piecewise linear over `[-h, 0, h] -> [0, 1, 0]`, clamped outside.
#[must_use]
pub fn drag_opacity(dy: f64, screen_height: f64) -> f64 {
    if screen_height <= 0.0 {
        return if dy == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - dy.abs() / screen_height).clamp(0.0, 1.0)
}
