#![forbid(unsafe_code)]

//! Deterministic frame driver.
//!
//! Stands in for the host's display link: advances a [`Lightbox`] by a fixed
//! frame delta and samples a frame after every tick. Runs are reproducible
//! because no wall clock is involved.

use std::time::Duration;

use lightbox_core::{Lightbox, OverlayFrame, OverlayPhase};
use thiserror::Error;
use tracing::info_span;

/// One frame at 60 Hz.
pub const FRAME_60HZ: Duration = Duration::from_nanos(16_666_667);

/// Default cap on frames for [`FrameDriver::run_until_idle`] (30 s at 60 Hz).
pub const DEFAULT_MAX_FRAMES: u64 = 1800;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("lightbox still animating after {frames} frames")]
    DidNotSettle { frames: u64 },
}

/// Fixed-step frame driver.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    frame: Duration,
    max_frames: u64,
    frames: u64,
    elapsed: Duration,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(FRAME_60HZ)
    }
}

impl FrameDriver {
    #[must_use]
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            max_frames: DEFAULT_MAX_FRAMES,
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Frames ticked so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated time so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Tick once and sample.
    pub fn step(&mut self, lightbox: &mut Lightbox) -> OverlayFrame {
        lightbox.tick(self.frame);
        self.frames += 1;
        self.elapsed += self.frame;
        lightbox.frame()
    }

    /// Tick `n` times, returning every sampled frame.
    pub fn run_frames(&mut self, lightbox: &mut Lightbox, n: usize) -> Vec<OverlayFrame> {
        (0..n).map(|_| self.step(lightbox)).collect()
    }

    /// Tick until the lightbox stops requesting frames.
    pub fn run_until_idle(
        &mut self,
        lightbox: &mut Lightbox,
    ) -> Result<Vec<OverlayFrame>, DriverError> {
        let _span = info_span!("frame_driver.run_until_idle", id = %lightbox.id()).entered();
        let start = self.frames;
        let mut out = Vec::new();
        while lightbox.needs_frame() {
            let ran = self.frames - start;
            if ran >= self.max_frames {
                return Err(DriverError::DidNotSettle { frames: ran });
            }
            out.push(self.step(lightbox));
        }
        tracing::debug!(frames = out.len(), phase = ?lightbox.phase(), "settled");
        Ok(out)
    }
}

/// Collapse consecutive duplicates into a phase history.
#[must_use]
pub fn phase_history(frames: &[OverlayFrame]) -> Vec<OverlayPhase> {
    let mut out: Vec<OverlayPhase> = Vec::new();
    for frame in frames {
        if out.last() != Some(&frame.phase) {
            out.push(frame.phase);
        }
    }
    out
}
