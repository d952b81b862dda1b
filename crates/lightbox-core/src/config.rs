#![forbid(unsafe_code)]

//! Lightbox configuration.
//!
//! [`LightboxConfig`] carries everything the overlay needs at construction:
//! the origin rectangle, spring parameters, scrim color, gesture switches
//! and the host platform. It can be built in code or, with the
//! `config-file` feature, loaded from TOML or JSON.
//!
//! ```toml
//! background_color = "black"
//! swipe_to_dismiss = true
//! platform = "android"
//!
//! [origin]
//! x = 10.0
//! y = 20.0
//! width = 30.0
//! height = 40.0
//!
//! [spring]
//! tension = 30.0
//! friction = 7.0
//! ```
//!
//! `origin` has no default: a config without it fails to load.

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect;
use crate::platform::Platform;

/// Vertical drag distance beyond which a release dismisses the overlay.
pub const DEFAULT_DISMISS_THRESHOLD: f64 = 50.0;

/// Default scrim color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "black";

// ---------------------------------------------------------------------------
// SpringConfig
// ---------------------------------------------------------------------------

/// Spring parameters in tension/friction form.
///
/// Converted to physical stiffness/damping with the origami mapping:
/// `stiffness = (tension - 30) * 3.62 + 194` and
/// `damping = (friction - 8) * 3 + 25`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct SpringConfig {
    pub tension: f64,
    pub friction: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 30.0,
            friction: 7.0,
        }
    }
}

impl SpringConfig {
    #[must_use]
    pub const fn new(tension: f64, friction: f64) -> Self {
        Self { tension, friction }
    }

    /// Physical stiffness for a unit-mass spring.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        (self.tension - 30.0) * 3.62 + 194.0
    }

    /// Physical damping for a unit-mass spring.
    #[must_use]
    pub fn damping(&self) -> f64 {
        (self.friction - 8.0) * 3.0 + 25.0
    }

    fn validate_into(&self, errors: &mut Vec<String>) {
        if !self.tension.is_finite() || !self.friction.is_finite() {
            errors.push(format!(
                "spring tension/friction must be finite, got {}/{}",
                self.tension, self.friction
            ));
            return;
        }
        if self.stiffness() <= 0.0 {
            errors.push(format!(
                "spring.tension {} gives non-positive stiffness {}",
                self.tension,
                self.stiffness()
            ));
        }
        // Undamped springs never settle, which would stall the animation gate.
        if self.damping() <= 0.0 {
            errors.push(format!(
                "spring.friction {} gives non-positive damping {}",
                self.friction,
                self.damping()
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// LightboxConfig
// ---------------------------------------------------------------------------

/// Construction-time options for a [`Lightbox`](crate::overlay::Lightbox).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct LightboxConfig {
    /// Where the content sits when the overlay is closed.
    pub origin: Rect,

    /// Applied to every spring (open, close, drag release).
    #[cfg_attr(feature = "config-file", serde(default))]
    pub spring: SpringConfig,

    /// Scrim color, passed through to the host untouched.
    #[cfg_attr(feature = "config-file", serde(default = "default_background_color"))]
    pub background_color: String,

    /// Initial open intent, acted on by [`Lightbox::mount`](crate::overlay::Lightbox::mount).
    #[cfg_attr(feature = "config-file", serde(default))]
    pub is_open: bool,

    /// Enables drag-to-dismiss.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub swipe_to_dismiss: bool,

    /// Host platform; decides the status-bar offset and hardware back support.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub platform: Platform,

    /// The host renders its own header instead of the default buttons.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub custom_header: bool,

    /// Image resource for the confirm button.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub confirm_icon: Option<String>,

    /// Vertical distance a drag must exceed to dismiss.
    #[cfg_attr(feature = "config-file", serde(default = "default_dismiss_threshold"))]
    pub dismiss_threshold: f64,
}

#[cfg(feature = "config-file")]
fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_owned()
}

#[cfg(feature = "config-file")]
fn default_dismiss_threshold() -> f64 {
    DEFAULT_DISMISS_THRESHOLD
}

impl LightboxConfig {
    /// Config with the given origin and every other option at its default.
    #[must_use]
    pub fn new(origin: Rect) -> Self {
        Self {
            origin,
            spring: SpringConfig::default(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_owned(),
            is_open: false,
            swipe_to_dismiss: false,
            platform: Platform::default(),
            custom_header: false,
            confirm_icon: None,
            dismiss_threshold: DEFAULT_DISMISS_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    #[must_use]
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    #[must_use]
    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = is_open;
        self
    }

    #[must_use]
    pub fn with_swipe_to_dismiss(mut self, enabled: bool) -> Self {
        self.swipe_to_dismiss = enabled;
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    #[must_use]
    pub fn with_custom_header(mut self, custom: bool) -> Self {
        self.custom_header = custom;
        self
    }

    #[must_use]
    pub fn with_confirm_icon(mut self, icon: impl Into<String>) -> Self {
        self.confirm_icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_dismiss_threshold(mut self, threshold: f64) -> Self {
        self.dismiss_threshold = threshold;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every option against its accepted range.
    ///
    /// Returns a list of messages; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let o = &self.origin;
        if ![o.x, o.y, o.width, o.height].iter().all(|v| v.is_finite()) {
            errors.push(format!("origin must be finite, got {o:?}"));
        } else if o.width < 0.0 || o.height < 0.0 {
            errors.push(format!(
                "origin size must be non-negative, got {}x{}",
                o.width, o.height
            ));
        }

        self.spring.validate_into(&mut errors);

        if self.background_color.trim().is_empty() {
            errors.push("background_color must not be empty".into());
        }

        if !(self.dismiss_threshold.is_finite() && self.dismiss_threshold > 0.0) {
            errors.push(format!(
                "dismiss_threshold must be positive, got {}",
                self.dismiss_threshold
            ));
        }

        errors
    }

    /// Consume the config, returning it if valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config-file")]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config-file")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Rect {
        Rect::new(10.0, 20.0, 30.0, 40.0)
    }

    #[test]
    fn defaults() {
        let config = LightboxConfig::new(origin());
        assert_eq!(config.spring, SpringConfig::new(30.0, 7.0));
        assert_eq!(config.background_color, "black");
        assert_eq!(config.dismiss_threshold, 50.0);
        assert!(!config.swipe_to_dismiss);
        assert!(!config.is_open);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn negative_origin_size_rejected() {
        let config = LightboxConfig::new(Rect::new(0.0, 0.0, -1.0, 10.0));
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("origin size"));
    }

    #[test]
    fn non_finite_origin_rejected() {
        let config = LightboxConfig::new(Rect::new(f64::NAN, 0.0, 1.0, 1.0));
        assert!(config.validate()[0].contains("finite"));
    }

    #[test]
    fn friction_without_damping_rejected() {
        let config = LightboxConfig::new(origin()).with_spring(SpringConfig::new(30.0, -1.0));
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("damping")), "{errors:?}");
    }

    #[test]
    fn zero_friction_still_damped() {
        let spring = SpringConfig::new(30.0, 0.0);
        assert!(spring.damping() > 0.0);
        assert!(LightboxConfig::new(origin()).with_spring(spring).validate().is_empty());
    }

    #[test]
    fn tension_below_zero_stiffness_rejected() {
        let config = LightboxConfig::new(origin()).with_spring(SpringConfig::new(-40.0, 7.0));
        assert!(config.validate().iter().any(|e| e.contains("stiffness")));
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = LightboxConfig::new(origin()).with_dismiss_threshold(0.0);
        assert!(config.validate().iter().any(|e| e.contains("dismiss_threshold")));
    }

    #[test]
    fn validated_joins_messages() {
        let err = LightboxConfig::new(origin())
            .with_background_color(" ")
            .with_dismiss_threshold(-1.0)
            .validated()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("background_color"));
        assert!(msg.contains("; "));
    }

    #[cfg(feature = "config-file")]
    mod file {
        use super::*;

        #[test]
        fn toml_minimal_uses_defaults() {
            let config = LightboxConfig::from_toml_str(
                "[origin]\nx = 10.0\ny = 20.0\nwidth = 30.0\nheight = 40.0\n",
            )
            .unwrap();
            assert_eq!(config, LightboxConfig::new(origin()));
        }

        #[test]
        fn toml_full() {
            let config = LightboxConfig::from_toml_str(
                r#"
                background_color = "white"
                swipe_to_dismiss = true
                platform = "android"
                confirm_icon = "check.png"
                dismiss_threshold = 80.0

                [origin]
                x = 1.0
                y = 2.0
                width = 3.0
                height = 4.0

                [spring]
                tension = 40.0
                "#,
            )
            .unwrap();
            assert_eq!(config.background_color, "white");
            assert!(config.swipe_to_dismiss);
            assert_eq!(config.platform, Platform::Android);
            assert_eq!(config.confirm_icon.as_deref(), Some("check.png"));
            assert_eq!(config.dismiss_threshold, 80.0);
            assert_eq!(config.spring, SpringConfig::new(40.0, 7.0));
        }

        #[test]
        fn toml_without_origin_fails() {
            let err = LightboxConfig::from_toml_str("swipe_to_dismiss = true\n").unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)), "{err}");
        }

        #[test]
        fn toml_invalid_values_fail_validation() {
            let err = LightboxConfig::from_toml_str(
                "[origin]\nx = 0.0\ny = 0.0\nwidth = 1.0\nheight = 1.0\n[spring]\nfriction = -5.0\n",
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{err}");
        }

        #[test]
        fn json_round_trip() {
            let config = LightboxConfig::new(origin())
                .with_swipe_to_dismiss(true)
                .with_platform(Platform::Android);
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(LightboxConfig::from_json_str(&json).unwrap(), config);
        }

        #[test]
        fn json_parse_error() {
            assert!(matches!(
                LightboxConfig::from_json_str("{").unwrap_err(),
                ConfigError::Json(_)
            ));
        }

        #[test]
        fn toml_file_missing_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = LightboxConfig::from_toml_file(dir.path().join("nope.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Io(_)));
        }

        #[test]
        fn toml_file_loads() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("lightbox.toml");
            std::fs::write(
                &path,
                "is_open = true\n[origin]\nx = 10.0\ny = 20.0\nwidth = 30.0\nheight = 40.0\n",
            )
            .unwrap();
            let config = LightboxConfig::from_toml_file(&path).unwrap();
            assert!(config.is_open);
        }
    }
}
