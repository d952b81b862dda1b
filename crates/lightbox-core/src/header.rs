#![forbid(unsafe_code)]

//! Header controls shown above the content.
//!
//! The overlay does not draw anything itself; it tells the host which
//! controls belong in the header. Presses are routed back through
//! [`Lightbox::press_close`](crate::overlay::Lightbox::press_close) and
//! [`Lightbox::press_confirm`](crate::overlay::Lightbox::press_confirm).

/// A control in the default header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderControl {
    Close,
    Confirm,
}

/// Which header the host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderLayout {
    /// The host renders its own header and calls `press_close` from it.
    Custom,
    CloseOnly,
    /// Close on the leading edge, confirm on the trailing edge.
    CloseAndConfirm,
}

impl HeaderLayout {
    /// A custom header wins; otherwise confirm appears only when the
    /// listener handles it.
    #[must_use]
    pub const fn resolve(custom_header: bool, has_confirm: bool) -> Self {
        match (custom_header, has_confirm) {
            (true, _) => Self::Custom,
            (false, true) => Self::CloseAndConfirm,
            (false, false) => Self::CloseOnly,
        }
    }

    /// Controls in leading-to-trailing order. Empty for [`HeaderLayout::Custom`].
    #[must_use]
    pub const fn controls(self) -> &'static [HeaderControl] {
        match self {
            Self::Custom => &[],
            Self::CloseOnly => &[HeaderControl::Close],
            Self::CloseAndConfirm => &[HeaderControl::Close, HeaderControl::Confirm],
        }
    }
}
