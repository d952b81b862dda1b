#![forbid(unsafe_code)]

//! Deterministic test harness for `lightbox-core`.
//!
//! - [`driver`]: fixed-step frame driver standing in for a display link.
//! - [`recording`]: listener, status bar and back-button fixtures that log
//!   every side effect in order.
//! - [`trace`]: JSONL frame/event traces.
//! - [`scenario`]: scripted open/dismiss runs built from the above.

pub mod driver;
pub mod recording;
pub mod scenario;
pub mod trace;

pub use driver::{DriverError, FRAME_60HZ, FrameDriver, phase_history};
pub use recording::{EventLog, Fixture, Recorded};
pub use scenario::{HarnessError, Scenario, ScenarioReport};
pub use trace::FrameTrace;
