//! End-to-end scenarios: open, dismiss by each path, run to rest.
//!
//! Origin `{10, 20, 30, 40}` on a 375x667 screen throughout.

use lightbox_core::{LightboxConfig, OverlayPhase, Platform, Rect, Size};
use lightbox_harness::recording::Recorded;
use lightbox_harness::scenario::{self, HarnessError, Scenario, ScenarioReport};
use serde_json::Value;

const ORIGIN: Rect = Rect::new(10.0, 20.0, 30.0, 40.0);
const SCREEN: Size = Size::new(375.0, 667.0);

fn run(config: LightboxConfig, scenario: Scenario) -> ScenarioReport {
    scenario::run(config, SCREEN, scenario).expect("scenario runs to rest")
}

fn ios() -> LightboxConfig {
    LightboxConfig::new(ORIGIN).with_swipe_to_dismiss(true)
}

fn android() -> LightboxConfig {
    ios().with_platform(Platform::Android)
}

fn count(report: &ScenarioReport, event: Recorded) -> usize {
    report.events.iter().filter(|e| **e == event).count()
}

fn frames(report: &ScenarioReport) -> Vec<&Value> {
    report
        .trace
        .lines()
        .iter()
        .filter(|l| l["kind"] == "frame")
        .collect()
}

fn last_frame(report: &ScenarioReport) -> &Value {
    frames(report).last().copied().expect("at least one frame")
}

#[test]
fn open_close_round_trip_returns_to_origin() {
    let report = run(ios(), Scenario::OpenClose);

    assert_eq!(report.final_phase, OverlayPhase::Closed);
    assert_eq!(
        report.events,
        vec![
            Recorded::StatusBarHidden(true),
            Recorded::Open,
            Recorded::HitClose,
            Recorded::StatusBarHidden(false),
            Recorded::Close,
        ]
    );

    let last = last_frame(&report);
    assert_eq!(last["phase"], "closed");
    assert_eq!(last["progress"], 0.0);
    assert_eq!(last["x"], ORIGIN.x);
    assert_eq!(last["y"], ORIGIN.y);
    assert_eq!(last["width"], ORIGIN.width);
    assert_eq!(last["height"], ORIGIN.height);
}

#[test]
fn open_reaches_full_screen_before_close() {
    let report = run(ios(), Scenario::OpenClose);
    let open = frames(&report)
        .into_iter()
        .find(|f| f["phase"] == "open")
        .expect("an open frame");
    assert_eq!(open["progress"], 1.0);
    assert_eq!(open["x"], 0.0);
    assert_eq!(open["y"], 0.0);
    assert_eq!(open["width"], SCREEN.width);
    assert_eq!(open["height"], SCREEN.height);
    assert_eq!(open["scrim_opacity"], 1.0);
}

#[test]
fn drag_just_under_threshold_springs_back() {
    let report = run(ios(), Scenario::Drag { dx: 0.0, dy: 49.0 });

    assert_eq!(report.final_phase, OverlayPhase::Open);
    assert_eq!(count(&report, Recorded::HitClose), 0);
    assert_eq!(count(&report, Recorded::Close), 0);

    let all = frames(&report);
    assert!(all.iter().any(|f| f["phase"] == "panning"));
    let peak = all
        .iter()
        .filter_map(|f| f["drag_offset"].as_f64())
        .fold(0.0f64, f64::max);
    assert!((peak - 49.0).abs() < 1e-9, "peak offset {peak}");

    let last = last_frame(&report);
    assert_eq!(last["phase"], "open");
    assert_eq!(last["drag_offset"], 0.0);
}

#[test]
fn drag_just_over_threshold_dismisses_once() {
    let report = run(ios(), Scenario::Drag { dx: 4.0, dy: 51.0 });

    assert_eq!(report.final_phase, OverlayPhase::Closed);
    assert_eq!(count(&report, Recorded::HitClose), 1);
    assert_eq!(count(&report, Recorded::Close), 1);

    let hit = report.events.iter().position(|e| *e == Recorded::HitClose);
    let close = report.events.iter().position(|e| *e == Recorded::Close);
    assert!(hit < close);

    // Closing frames start at the released position with the drag opacity.
    let first_closing = frames(&report)
        .into_iter()
        .find(|f| f["phase"] == "closing")
        .expect("a closing frame");
    let x = first_closing["x"].as_f64().unwrap_or(f64::NAN);
    let y = first_closing["y"].as_f64().unwrap_or(f64::NAN);
    assert!((x - 4.0).abs() < 1.0, "x {x}");
    assert!((y - 51.0).abs() < 2.0, "y {y}");
    let opacity = first_closing["scrim_opacity"].as_f64().unwrap_or(f64::NAN);
    assert!(opacity <= 1.0 - 51.0 / SCREEN.height + 1e-9);
}

#[test]
fn upward_drag_dismisses_too() {
    let report = run(ios(), Scenario::Drag { dx: 0.0, dy: -80.0 });
    assert_eq!(report.final_phase, OverlayPhase::Closed);
    assert_eq!(count(&report, Recorded::Close), 1);
}

#[test]
fn swipe_disabled_refuses_drag() {
    let config = LightboxConfig::new(ORIGIN).with_swipe_to_dismiss(false);
    let err = scenario::run(config, SCREEN, Scenario::Drag { dx: 0.0, dy: 200.0 })
        .expect_err("grant refused");
    assert!(matches!(err, HarnessError::Refused(_)), "{err}");
}

#[test]
fn android_back_press_unregisters_once() {
    let report = run(android(), Scenario::BackPress);

    assert_eq!(report.final_phase, OverlayPhase::Closed);
    let registered: Vec<_> = report
        .events
        .iter()
        .filter_map(|e| match e {
            Recorded::BackRegistered(id) => Some(*id),
            _ => None,
        })
        .collect();
    let unregistered: Vec<_> = report
        .events
        .iter()
        .filter_map(|e| match e {
            Recorded::BackUnregistered(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered, unregistered);
    assert_eq!(count(&report, Recorded::HitClose), 1);
    assert_eq!(count(&report, Recorded::Close), 1);
}

#[test]
fn android_closed_frame_includes_status_bar_offset() {
    let report = run(android(), Scenario::OpenClose);
    let last = last_frame(&report);
    assert_eq!(last["y"], ORIGIN.y - 25.0);
}

#[test]
fn ios_never_touches_back_registry() {
    let report = run(ios(), Scenario::OpenClose);
    assert!(!report.events.iter().any(|e| matches!(
        e,
        Recorded::BackRegistered(_) | Recorded::BackUnregistered(_)
    )));
}

#[test]
fn confirm_fires_before_close() {
    let report = run(ios(), Scenario::Confirm);
    assert_eq!(report.final_phase, OverlayPhase::Closed);
    let names: Vec<_> = report.events.iter().map(Recorded::name).collect();
    let confirm = names.iter().position(|n| *n == "confirm");
    let hit = names.iter().position(|n| *n == "hit_close");
    let close = names.iter().position(|n| *n == "close");
    assert!(confirm.is_some());
    assert!(confirm < hit && hit < close, "{names:?}");
}

#[test]
fn trace_is_sequenced_jsonl() {
    let report = run(ios(), Scenario::OpenClose);
    let text = report.trace.to_jsonl();
    let parsed: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json"))
        .collect();
    assert_eq!(parsed.len(), report.trace.len());
    for (i, line) in parsed.iter().enumerate() {
        assert_eq!(line["seq"], i);
        assert_eq!(line["run_id"], report.trace.run_id());
    }
    // The open callback is logged before the frame that shows the open state.
    let open_event = parsed.iter().position(|l| l["event"] == "open");
    let open_frame = parsed.iter().position(|l| l["phase"] == "open");
    assert!(open_event < open_frame);
}

#[test]
fn settles_in_simulated_seconds() {
    let report = run(ios(), Scenario::OpenClose);
    // Two transitions at 60 Hz, well within the 10 s spring budget each.
    assert!(report.frames < 240, "frames {}", report.frames);
}
