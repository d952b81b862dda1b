#![forbid(unsafe_code)]

//! Scripted end-to-end scenarios.
//!
//! A scenario opens the lightbox, performs one dismissal path (or a drag
//! that returns), and runs every animation to rest, recording frames and
//! side effects into a [`FrameTrace`].

use lightbox_core::{
    ConfigError, GestureEvent, LightboxConfig, OverlayPhase, Size,
};
use thiserror::Error;
use tracing::info_span;

use crate::driver::{DriverError, FrameDriver};
use crate::recording::{Fixture, Recorded};
use crate::trace::FrameTrace;

/// Number of move events a scripted drag is split into.
const DRAG_STEPS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    /// Open, then press the close button.
    OpenClose,
    /// Open, then drag to `(dx, dy)` and release.
    Drag { dx: f64, dy: f64 },
    /// Open, then press hardware back.
    BackPress,
    /// Open, then press confirm.
    Confirm,
}

impl Scenario {
    /// Parse a scenario name; `drag` takes its displacement from `dx`/`dy`.
    #[must_use]
    pub fn parse(name: &str, dx: f64, dy: f64) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "open-close" | "open_close" | "close" => Some(Self::OpenClose),
            "drag" => Some(Self::Drag { dx, dy }),
            "back" | "back-press" | "back_press" => Some(Self::BackPress),
            "confirm" => Some(Self::Confirm),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::OpenClose => "open_close",
            Self::Drag { .. } => "drag",
            Self::BackPress => "back_press",
            Self::Confirm => "confirm",
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("scenario step refused: {0}")]
    Refused(&'static str),
}

/// What a scenario produced.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub trace: FrameTrace,
    pub events: Vec<Recorded>,
    pub final_phase: OverlayPhase,
    pub frames: u64,
}

struct Runner {
    fx: Fixture,
    driver: FrameDriver,
    trace: FrameTrace,
    seen: usize,
}

impl Runner {
    fn flush_events(&mut self) {
        let events = self.fx.log.snapshot();
        for event in &events[self.seen..] {
            self.trace.record_event(*event);
        }
        self.seen = events.len();
    }

    fn step(&mut self) {
        self.flush_events();
        let frame = self.driver.step(&mut self.fx.lightbox);
        self.flush_events();
        self.trace.record_frame(&frame);
    }

    fn settle(&mut self) -> Result<(), HarnessError> {
        self.flush_events();
        let frames = self.driver.run_until_idle(&mut self.fx.lightbox)?;
        // Completion callbacks fire on the last frame; keep them ahead of
        // the frame that shows the settled state.
        let last = frames.len().saturating_sub(1);
        for (i, frame) in frames.iter().enumerate() {
            if i == last {
                self.flush_events();
            }
            self.trace.record_frame(frame);
        }
        self.flush_events();
        Ok(())
    }

    fn drag(&mut self, dx: f64, dy: f64) -> Result<(), HarnessError> {
        if !self.fx.lightbox.handle_gesture(GestureEvent::Grant) {
            return Err(HarnessError::Refused("gesture grant"));
        }
        for i in 1..=DRAG_STEPS {
            let t = f64::from(i) / f64::from(DRAG_STEPS);
            self.fx
                .lightbox
                .handle_gesture(GestureEvent::Move { dx: dx * t, dy: dy * t });
            self.step();
        }
        self.fx
            .lightbox
            .handle_gesture(GestureEvent::Release { dx, dy });
        Ok(())
    }
}

/// Run `scenario` against a fresh lightbox.
pub fn run(
    config: LightboxConfig,
    screen: Size,
    scenario: Scenario,
) -> Result<ScenarioReport, HarnessError> {
    let _span = info_span!("scenario", name = scenario.name()).entered();

    let fx = if scenario == Scenario::Confirm {
        Fixture::with_confirm(config, screen)?
    } else {
        Fixture::new(config, screen)?
    };
    let mut runner = Runner {
        trace: FrameTrace::new(format!("{}_{}", scenario.name(), fx.lightbox.id().get())),
        fx,
        driver: FrameDriver::default(),
        seen: 0,
    };

    runner.fx.lightbox.set_open_intent(true);
    runner.settle()?;

    match scenario {
        Scenario::OpenClose => runner.fx.lightbox.press_close(),
        Scenario::Drag { dx, dy } => runner.drag(dx, dy)?,
        Scenario::BackPress => {
            if !runner.fx.lightbox.handle_back_press().is_handled() {
                return Err(HarnessError::Refused("back press"));
            }
        }
        Scenario::Confirm => {
            if !runner.fx.lightbox.press_confirm() {
                return Err(HarnessError::Refused("confirm"));
            }
        }
    }
    runner.settle()?;

    // The owner clears its intent once the close has been reported.
    if runner.fx.lightbox.phase() == OverlayPhase::Closed {
        runner.fx.lightbox.set_open_intent(false);
    }

    Ok(ScenarioReport {
        events: runner.fx.log.snapshot(),
        final_phase: runner.fx.lightbox.phase(),
        frames: runner.driver.frames(),
        trace: runner.trace,
    })
}
