#![forbid(unsafe_code)]

//! Lightbox scenario runner.
//!
//! Runs one scripted scenario and writes its JSONL trace to stdout. Logs go
//! to stderr, filtered by `RUST_LOG`.
//!
//! # Running
//!
//! ```sh
//! LIGHTBOX_HARNESS_SCENARIO=drag LIGHTBOX_HARNESS_DRAG_DY=120 \
//!     cargo run -p lightbox-harness
//! ```
//!
//! # Environment
//!
//! - `LIGHTBOX_HARNESS_CONFIG`: TOML config file (default: built-in origin).
//! - `LIGHTBOX_HARNESS_SCENARIO`: `open-close`, `drag`, `back`, `confirm`.
//! - `LIGHTBOX_HARNESS_DRAG_DX` / `LIGHTBOX_HARNESS_DRAG_DY`: drag target.
//! - `LIGHTBOX_HARNESS_SCREEN`: `WIDTHxHEIGHT` (default `375x667`).
//! - `LIGHTBOX_HARNESS_LOG_JSON`: emit logs as JSON.

use std::io::{self, Write};
use std::process::ExitCode;

use lightbox_core::{LightboxConfig, Rect, Size};
use lightbox_harness::scenario::{self, Scenario};
use tracing_subscriber::EnvFilter;

const DEFAULT_ORIGIN: Rect = Rect::new(10.0, 20.0, 30.0, 40.0);
const DEFAULT_SCREEN: Size = Size::new(375.0, 667.0);
const DEFAULT_DRAG_DY: f64 = 120.0;

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key).is_ok_and(|v| matches!(v.as_str(), "1" | "true" | "yes"))
}

fn parse_screen(raw: &str) -> Option<Size> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    Some(Size::new(w.parse().ok()?, h.parse().ok()?))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if env_flag("LIGHTBOX_HARNESS_LOG_JSON") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var("LIGHTBOX_HARNESS_CONFIG") {
        Ok(path) => LightboxConfig::from_toml_file(&path)?,
        Err(_) => LightboxConfig::new(DEFAULT_ORIGIN),
    };
    let screen = std::env::var("LIGHTBOX_HARNESS_SCREEN")
        .ok()
        .and_then(|raw| parse_screen(&raw))
        .unwrap_or(DEFAULT_SCREEN);

    let name = std::env::var("LIGHTBOX_HARNESS_SCENARIO").unwrap_or_else(|_| "open-close".into());
    let dx = env_f64("LIGHTBOX_HARNESS_DRAG_DX").unwrap_or(0.0);
    let dy = env_f64("LIGHTBOX_HARNESS_DRAG_DY").unwrap_or(DEFAULT_DRAG_DY);
    let scenario = Scenario::parse(&name, dx, dy)
        .ok_or_else(|| format!("unknown scenario {name:?}"))?;

    let report = scenario::run(config, screen, scenario)?;
    tracing::info!(
        frames = report.frames,
        phase = ?report.final_phase,
        events = report.events.len(),
        "scenario complete"
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(report.trace.to_jsonl().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "scenario failed");
            eprintln!("lightbox-harness: {err}");
            ExitCode::FAILURE
        }
    }
}
