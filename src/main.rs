//! PetZone monitor: host entry point.
//!
//! Replays a fixed set of reference readings through the monitoring
//! service and prints each decision record and the final service report
//! as JSON on stdout.  Logs go to stderr.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  ScriptedSource   RecordingDeviceController   LogAlertSink   │
//! │  (SensorSource)   (DeviceActuator)            (AlertSink)    │
//! │  LogEventSink (EventSink)                                    │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │         MonitorService (pure logic)                │      │
//! │  │  DecisionEngine · AlertCooldown · FanPolicy        │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `petzone [config.json]`
#![deny(unused_must_use)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use log::info;
use tracing_subscriber::EnvFilter;

use petzone::adapters::alerts::LogAlertSink;
use petzone::adapters::devices::RecordingDeviceController;
use petzone::adapters::log_sink::LogEventSink;
use petzone::adapters::source::ScriptedSource;
use petzone::app::service::{MonitorService, TickStatus};
use petzone::config::MonitorConfig;
use petzone::engine::DecisionEngine;
use petzone::reading::SensorPayload;

/// Temperature, humidity, presence, movement.
const REFERENCE_READINGS: [(f64, f64, i64, i64); 5] = [
    (35.0, 60.0, 100, 50),
    (8.0, 45.0, 80, 20),
    (25.0, 60.0, 0, 0),
    (25.0, 60.0, 80, 40),
    (25.0, 60.0, 100, 100),
];

fn load_config() -> Result<MonitorConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(MonitorConfig::default());
    };
    MonitorConfig::load(Path::new(&path)).with_context(|| format!("loading config {path}"))
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("PetZone monitor v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config = load_config()?;
    let interval = Duration::seconds(i64::from(config.check_interval_secs));

    // ── 3. Engine + adapters ──────────────────────────────────
    let engine = Arc::new(DecisionEngine::new());
    let mut service = MonitorService::new(Arc::clone(&engine), config);

    let mut now = Utc::now();
    let mut source = ScriptedSource::from_payloads(REFERENCE_READINGS.iter().enumerate().map(
        |(i, &(t, h, p, m))| {
            SensorPayload::complete(t, h, p, m, now + interval * i32::try_from(i).unwrap_or(0))
        },
    ));
    let mut devices = RecordingDeviceController::new();
    let mut alerts = LogAlertSink::new();
    let mut sink = LogEventSink::new();

    // ── 4. Replay ─────────────────────────────────────────────
    service.start(now, &mut sink);
    while source.remaining() > 0 {
        let outcome = service.tick(now, &mut source, &mut devices, &mut alerts, &mut sink);
        if let (TickStatus::Decided(_), Some(decision)) = (outcome.status, service.last_decision()) {
            println!("{}", serde_json::to_string_pretty(decision)?);
        }
        now += interval;
    }

    // ── 5. Report ─────────────────────────────────────────────
    let report = service.report(now);
    println!("{}", serde_json::to_string_pretty(&report)?);
    info!(
        "Replay finished: {} decisions, {} alerts, {} emergencies",
        report.service_stats.decisions_made, alerts.alerts(), alerts.emergencies()
    );
    Ok(())
}
