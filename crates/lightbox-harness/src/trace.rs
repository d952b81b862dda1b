#![forbid(unsafe_code)]

//! JSONL trace of sampled frames and side effects.
//!
//! Each line is one JSON object with a sequence number and a `kind` of
//! `"frame"` or `"event"`. Field order is fixed so traces diff cleanly.

use lightbox_core::{OverlayFrame, OverlayPhase};
use serde_json::{Value, json};

use crate::recording::Recorded;

/// Stable lowercase name for a phase.
#[must_use]
pub fn phase_name(phase: OverlayPhase) -> &'static str {
    match phase {
        OverlayPhase::Closed => "closed",
        OverlayPhase::Opening => "opening",
        OverlayPhase::Open => "open",
        OverlayPhase::Panning => "panning",
        OverlayPhase::Closing => "closing",
    }
}

/// Append-only JSONL trace.
#[derive(Debug, Clone, Default)]
pub struct FrameTrace {
    run_id: String,
    lines: Vec<Value>,
}

impl FrameTrace {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn record_frame(&mut self, frame: &OverlayFrame) {
        let seq = self.lines.len();
        self.lines.push(json!({
            "seq": seq,
            "run_id": self.run_id,
            "kind": "frame",
            "phase": phase_name(frame.phase),
            "progress": frame.progress,
            "x": frame.content.x,
            "y": frame.content.y,
            "width": frame.content.width,
            "height": frame.content.height,
            "scrim_opacity": frame.scrim_opacity,
            "drag_offset": frame.drag_offset,
        }));
    }

    pub fn record_event(&mut self, event: Recorded) {
        let seq = self.lines.len();
        self.lines.push(json!({
            "seq": seq,
            "run_id": self.run_id,
            "kind": "event",
            "event": event.name(),
        }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[Value] {
        &self.lines
    }

    /// Render as newline-terminated JSONL.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }
}
