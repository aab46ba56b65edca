//! Integration tests for the MonitorService → engine → devices/alerts pipeline.
//!
//! These verify the full chain from a sensor payload down to device
//! commands, alerts and emitted events using recording mocks.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::mock_adapters::{MockAlerts, MockDevices, MockSource, RecordingSink};

use petzone::app::commands::AppCommand;
use petzone::app::events::AppEvent;
use petzone::app::ports::{AlertError, Device, DeviceError, SourceError};
use petzone::app::service::{MANUAL_REASON, MonitorService, TickStatus};
use petzone::config::MonitorConfig;
use petzone::engine::DecisionEngine;
use petzone::engine::decision::{Action, AlertLevel};
use petzone::error::{Error, ReadingError};
use petzone::reading::{
    NEUTRAL_MOVEMENT, NEUTRAL_PRESENCE, NEUTRAL_TEMPERATURE, Reading, SensorPayload,
    ValidationPolicy,
};

fn t(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
}

fn payload(temp: f64, hum: f64, presence: i64, movement: i64, at: i64) -> SensorPayload {
    SensorPayload::complete(temp, hum, presence, movement, t(at))
}

struct Rig {
    service: MonitorService,
    devices: MockDevices,
    alerts: MockAlerts,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: MonitorConfig) -> Self {
        let mut sink = RecordingSink::new();
        let mut service = MonitorService::new(Arc::new(DecisionEngine::new()), config);
        service.start(t(0), &mut sink);
        Self {
            service,
            devices: MockDevices::new(),
            alerts: MockAlerts::new(),
            sink,
        }
    }

    fn tick(&mut self, now: i64, source: &mut MockSource) -> petzone::app::service::TickOutcome {
        self.service.tick(
            t(now),
            source,
            &mut self.devices,
            &mut self.alerts,
            &mut self.sink,
        )
    }

    fn command(&mut self, now: i64, cmd: AppCommand) -> petzone::Result<()> {
        self.service
            .handle_command(cmd, t(now), &mut self.devices, &mut self.sink)
    }
}

fn rig() -> Rig {
    Rig::new(MonitorConfig::default())
}

// ── Hot habitat → fan on at full intensity ───────────────────

#[test]
fn hot_reading_commands_fan() {
    let mut rig = rig();
    let mut src = MockSource::new().then_payload(payload(35.0, 60.0, 100, 50, 0));

    let out = rig.tick(0, &mut src);

    assert_eq!(out.status, TickStatus::Decided(AlertLevel::Safe));
    assert_eq!(out.next_check_secs, 5);
    let cmd = rig.devices.last().expect("fan should be commanded");
    assert_eq!(cmd.device, Device::Fan);
    assert!(cmd.on);
    assert_eq!(cmd.intensity, 100);
    assert!(rig.alerts.alerts.is_empty(), "safe decisions raise no alert");
    assert_eq!(rig.service.stats().decisions_made, 1);
    assert_eq!(rig.service.stats().actions_executed, 1);
}

#[test]
fn fan_intensity_follows_policy() {
    let mut rig = rig();
    // warm 0.667 + very_hot 0.167 at 33 °C: hot degree 0.5.
    let mut src = MockSource::new().then_payload(payload(33.0, 60.0, 80, 40, 0));
    rig.tick(0, &mut src);
    assert_eq!(rig.devices.last().map(|c| c.intensity), Some(80));
}

// ── No detection → emergency + rate-limited alert ────────────

#[test]
fn no_detection_sends_emergency_and_alert() {
    let mut rig = rig();
    let mut src = MockSource::new().then_payload(payload(25.0, 60.0, 0, 0, 0));

    let out = rig.tick(0, &mut src);

    assert_eq!(out.status, TickStatus::Decided(AlertLevel::Warning));
    assert_eq!(rig.alerts.emergencies.len(), 1);
    assert_eq!(rig.alerts.alerts, vec![AlertLevel::Warning]);
    let stats = rig.service.stats();
    assert_eq!(stats.emergencies_sent, 1);
    assert_eq!(stats.notifications, 1);
    assert_eq!(stats.alerts_sent, 1);
}

#[test]
fn repeat_alert_inside_cooldown_is_suppressed_but_emergency_is_not() {
    let mut rig = rig();
    let mut src = MockSource::new()
        .then_payload(payload(25.0, 60.0, 0, 0, 0))
        .then_payload(payload(25.0, 60.0, 0, 0, 10))
        .then_payload(payload(25.0, 60.0, 0, 0, 30));

    rig.tick(0, &mut src);
    rig.tick(10, &mut src);
    assert_eq!(rig.alerts.alerts.len(), 1);
    assert_eq!(rig.alerts.emergencies.len(), 2);
    assert_eq!(rig.service.stats().alerts_suppressed, 1);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::AlertSuppressed(AlertLevel::Warning))),
        1
    );

    rig.tick(30, &mut src);
    assert_eq!(rig.alerts.alerts.len(), 2, "window elapsed");
}

#[test]
fn reset_cooldowns_reopens_alerts() {
    let mut rig = rig();
    let mut src = MockSource::new()
        .then_payload(payload(25.0, 60.0, 0, 0, 0))
        .then_payload(payload(25.0, 60.0, 0, 0, 5));

    rig.tick(0, &mut src);
    rig.command(1, AppCommand::ResetCooldowns).unwrap();
    rig.tick(5, &mut src);

    assert_eq!(rig.alerts.alerts.len(), 2);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::CooldownsReset)), 1);
}

#[test]
fn failed_alert_is_retried_next_tick() {
    let mut rig = rig();
    rig.alerts.fail = Some(AlertError::Unavailable);
    let mut src = MockSource::new()
        .then_payload(payload(25.0, 60.0, 0, 0, 0))
        .then_payload(payload(25.0, 60.0, 0, 0, 5));

    rig.tick(0, &mut src);
    assert_eq!(rig.service.stats().alert_failures, 2, "alert and emergency");

    rig.alerts.fail = None;
    rig.tick(5, &mut src);
    assert_eq!(rig.alerts.alerts, vec![AlertLevel::Warning]);
}

// ── Missing data never becomes a zero reading ─────────────────

#[test]
fn empty_source_skips_evaluation() {
    let mut rig = rig();
    let mut src = MockSource::new().then_empty();

    let out = rig.tick(0, &mut src);

    assert_eq!(out.status, TickStatus::NoReading);
    assert!(rig.service.last_decision().is_none());
    assert_eq!(rig.service.engine().history_len(), 0);
    assert!(rig.alerts.emergencies.is_empty(), "no false emergency");
}

#[test]
fn source_failures_back_off_and_keep_last_known_good() {
    let mut rig = rig();
    let mut src = MockSource::new()
        .then_payload(payload(25.0, 60.0, 80, 40, 0))
        .then_error(SourceError::Timeout)
        .then_error(SourceError::Unavailable)
        .then_payload(payload(25.0, 60.0, 80, 40, 30));

    rig.tick(0, &mut src);
    let good = rig.service.last_reading().copied();

    let out = rig.tick(5, &mut src);
    assert_eq!(out.status, TickStatus::SourceFailed(SourceError::Timeout));
    assert_eq!(out.next_check_secs, 10);

    let out = rig.tick(15, &mut src);
    assert_eq!(out.next_check_secs, 20);
    assert_eq!(rig.service.consecutive_failures(), 2);
    assert_eq!(rig.service.last_reading().copied(), good);

    let out = rig.tick(35, &mut src);
    assert!(matches!(out.status, TickStatus::Decided(_)));
    assert_eq!(out.next_check_secs, 5);
    assert_eq!(rig.service.stats().source_failures, 2);
}

// ── Validation policy ─────────────────────────────────────────

#[test]
fn incomplete_payload_is_rejected_by_default() {
    let mut rig = rig();
    let mut src = MockSource::new().then_payload(SensorPayload {
        temperature: None,
        ..payload(25.0, 60.0, 80, 40, 0)
    });

    let out = rig.tick(0, &mut src);

    assert_eq!(
        out.status,
        TickStatus::ReadingRejected(ReadingError::MissingTemperature)
    );
    assert_eq!(rig.service.stats().readings_rejected, 1);
    assert_eq!(rig.service.engine().history_len(), 0);
}

#[test]
fn missing_signals_are_rejected_without_emergency() {
    let mut rig = rig();
    let mut src = MockSource::new().then_payload(SensorPayload {
        presence_energy: None,
        movement_energy: None,
        ..payload(25.0, 60.0, 80, 40, 0)
    });

    let out = rig.tick(0, &mut src);

    assert_eq!(
        out.status,
        TickStatus::ReadingRejected(ReadingError::MissingPresence)
    );
    assert!(rig.alerts.emergencies.is_empty());
    assert!(rig.alerts.alerts.is_empty());
    assert_eq!(rig.service.engine().history_len(), 0);
    assert!(rig.service.last_decision().is_none());
}

#[test]
fn clamp_policy_evaluates_with_reduced_confidence() {
    let mut rig = Rig::new(MonitorConfig {
        validation: ValidationPolicy::Clamp,
        ..MonitorConfig::default()
    });
    let mut src = MockSource::new().then_payload(SensorPayload {
        presence_energy: None,
        movement_energy: None,
        ..payload(25.0, 60.0, 0, 0, 0)
    });

    let out = rig.tick(0, &mut src);

    assert_eq!(out.status, TickStatus::Decided(AlertLevel::Safe));
    assert!(rig.alerts.emergencies.is_empty(), "absent signal read as no pet");
    let decision = rig.service.last_decision().unwrap();
    assert_eq!(decision.actions.as_slice(), &[Action::None]);

    let full = DecisionEngine::new().decide(&Reading::at(
        25.0,
        60.0,
        NEUTRAL_PRESENCE,
        NEUTRAL_MOVEMENT,
        t(0),
    ));
    assert!((decision.confidence - full.confidence * 0.7).abs() < 1e-9);
}

#[test]
fn clamp_policy_substitutes_neutral_environment() {
    let mut rig = Rig::new(MonitorConfig {
        validation: ValidationPolicy::Clamp,
        ..MonitorConfig::default()
    });
    let mut src = MockSource::new()
        .then_payload(SensorPayload {
            temperature: None,
            ..payload(25.0, 60.0, 80, 40, 0)
        })
        .then_payload(SensorPayload {
            temperature: Some(f64::NAN),
            humidity: None,
            ..payload(25.0, 60.0, 80, 40, 5)
        });

    for now in [0, 5] {
        let out = rig.tick(now, &mut src);
        assert_eq!(out.status, TickStatus::Decided(AlertLevel::Safe));
        let decision = rig.service.last_decision().unwrap();
        assert_eq!(decision.actions.as_slice(), &[Action::None]);
        assert!(!decision.message.contains("cold"), "{}", decision.message);
        let reading = rig.service.last_reading().unwrap();
        assert_eq!(reading.temperature, NEUTRAL_TEMPERATURE);
        assert!(reading.missing.environment);
    }
    assert!(rig.alerts.emergencies.is_empty());
    assert!(rig.alerts.alerts.is_empty());
    assert!(rig.devices.commands.is_empty());
}

#[test]
fn alerts_carry_the_reading_snapshot() {
    let mut rig = rig();
    let mut src = MockSource::new().then_payload(payload(38.0, 60.0, 0, 0, 0));

    rig.tick(0, &mut src);

    assert_eq!(rig.alerts.emergencies.len(), 1);
    assert_eq!(rig.alerts.alerts.len(), 1);
    let expected = Reading::at(38.0, 60.0, 0, 0, t(0));
    assert_eq!(rig.alerts.snapshots, vec![expected, expected]);
}

// ── Device failures are reported, not raised ──────────────────

#[test]
fn device_failure_does_not_abort_tick() {
    let mut rig = rig();
    rig.devices.fail = Some(DeviceError::Unreachable);
    let mut src = MockSource::new().then_payload(payload(38.0, 60.0, 80, 40, 0));

    let out = rig.tick(0, &mut src);

    assert!(matches!(out.status, TickStatus::Decided(_)));
    assert_eq!(rig.service.stats().device_failures, 1);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::DeviceCommandFailed {
                device: Device::Fan,
                error: DeviceError::Unreachable
            }
        )),
        1
    );
    assert_eq!(rig.alerts.emergencies.len(), 1, "very hot still escalates");
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn manual_control_reaches_device_with_clamped_intensity() {
    let mut rig = rig();
    rig.command(
        0,
        AppCommand::ManualControl {
            device: Device::Heater,
            on: true,
            intensity: 150,
        },
    )
    .unwrap();

    let cmd = rig.devices.last().unwrap();
    assert_eq!(cmd.device, Device::Heater);
    assert_eq!(cmd.intensity, 100);
    assert_eq!(cmd.reason, MANUAL_REASON);
}

#[test]
fn manual_control_failure_is_returned() {
    let mut rig = rig();
    rig.devices.fail = Some(DeviceError::Timeout);
    let err = rig
        .command(
            0,
            AppCommand::ManualControl {
                device: Device::Light,
                on: true,
                intensity: 50,
            },
        )
        .unwrap_err();
    assert_eq!(err, Error::Device(DeviceError::Timeout));
}

#[test]
fn invalid_config_update_is_refused() {
    let mut rig = rig();
    let bad = MonitorConfig {
        check_interval_secs: 0,
        ..MonitorConfig::default()
    };
    let err = rig.command(0, AppCommand::UpdateConfig(bad)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(rig.service.config().check_interval_secs, 5);
}

#[test]
fn stopped_service_does_not_poll() {
    let mut rig = rig();
    rig.command(0, AppCommand::Stop).unwrap();
    let mut src = MockSource::new().then_payload(payload(25.0, 60.0, 0, 0, 0));

    let out = rig.tick(0, &mut src);

    assert_eq!(out.status, TickStatus::Idle);
    assert_eq!(src.polls, 0);
    rig.command(1, AppCommand::Start).unwrap();
    assert!(rig.service.is_running());
}

// ── Report ────────────────────────────────────────────────────

#[test]
fn report_joins_counters_and_engine_statistics() {
    let mut rig = rig();
    let mut src = MockSource::new()
        .then_payload(payload(25.0, 60.0, 80, 40, 0))
        .then_payload(payload(25.0, 60.0, 0, 0, 5));
    rig.tick(0, &mut src);
    rig.tick(5, &mut src);

    let report = rig.service.report(t(120));

    assert_eq!(report.uptime_secs, 120);
    assert!(report.is_running);
    assert_eq!(report.service_stats.decisions_made, 2);
    assert_eq!(report.last_decision_at, Some(t(5)));
    let stats = report.engine_statistics.unwrap();
    assert_eq!(stats.total_decisions, 2);
    assert_eq!(stats.alerts(AlertLevel::Safe), 1);
    assert_eq!(stats.alerts(AlertLevel::Warning), 1);
}

#[test]
fn engine_is_shared_with_other_callers() {
    let engine = Arc::new(DecisionEngine::new());
    let mut sink = RecordingSink::new();
    let mut service = MonitorService::new(Arc::clone(&engine), MonitorConfig::default());
    service.start(t(0), &mut sink);

    engine.evaluate(&Reading::at(25.0, 60.0, 80, 40, t(0)));
    let mut src = MockSource::new().then_payload(payload(25.0, 60.0, 80, 40, 1));
    service.tick(
        t(1),
        &mut src,
        &mut MockDevices::new(),
        &mut MockAlerts::new(),
        &mut sink,
    );

    assert_eq!(engine.history_len(), 2);
}
