//! Monitoring service: the hexagonal core.
//!
//! [`MonitorService`] owns the alert cooldown gate, the service counters
//! and the last known good reading/decision, and shares the
//! [`DecisionEngine`] with anyone else holding the `Arc`.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorSource ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │      MonitorService       │
//! DeviceActuator ◀──│ Engine · Cooldown · Fan   │──▶ AlertSink
//!                   └──────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::config::MonitorConfig;
use crate::cooldown::AlertCooldown;
use crate::control::fan::MAX_INTENSITY;
use crate::diagnostics::{ServiceReport, ServiceStats};
use crate::engine::DecisionEngine;
use crate::engine::decision::{Action, AlertLevel, Decision};
use crate::error::{ReadingError, Result};
use crate::reading::Reading;

use super::commands::AppCommand;
use super::events::{AppEvent, DecisionSummary};
use super::ports::{
    AlertSink, Device, DeviceActuator, DeviceCommand, DeviceError, DeviceResponse, EventSink,
    SensorSource, SourceError,
};

/// Reason attached to commands issued by [`AppCommand::ManualControl`].
pub const MANUAL_REASON: &str = "manual control";

// ───────────────────────────────────────────────────────────────
// Tick outcome
// ───────────────────────────────────────────────────────────────

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Decided(AlertLevel),
    NoReading,
    SourceFailed(SourceError),
    ReadingRejected(ReadingError),
    /// The service is stopped; nothing was polled.
    Idle,
}

/// Result of [`MonitorService::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub status: TickStatus,
    /// Delay before the next tick, including failure backoff.
    pub next_check_secs: u32,
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

pub struct MonitorService {
    engine: Arc<DecisionEngine>,
    config: MonitorConfig,
    cooldown: AlertCooldown,
    stats: ServiceStats,
    running: bool,
    started_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    last_reading: Option<Reading>,
    last_decision: Option<Decision>,
}

impl MonitorService {
    /// Construct the service.  Does **not** start it; call [`start`](Self::start).
    pub fn new(engine: Arc<DecisionEngine>, config: MonitorConfig) -> Self {
        let cooldown = AlertCooldown::new(config.alert_cooldown_secs);
        Self {
            engine,
            config,
            cooldown,
            stats: ServiceStats::default(),
            running: false,
            started_at: None,
            consecutive_failures: 0,
            last_reading: None,
            last_decision: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>, sink: &mut impl EventSink) {
        if self.running {
            return;
        }
        self.running = true;
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        sink.emit(&AppEvent::Started(now));
        info!(
            "MonitorService started (interval={}s, cooldown={}s)",
            self.config.check_interval_secs, self.config.alert_cooldown_secs
        );
    }

    pub fn stop(&mut self, sink: &mut impl EventSink) {
        if !self.running {
            return;
        }
        self.running = false;
        sink.emit(&AppEvent::Stopped);
        info!("MonitorService stopped");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one monitoring cycle: fetch → validate → evaluate → act → alert.
    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        source: &mut impl SensorSource,
        devices: &mut impl DeviceActuator,
        alerts: &mut impl AlertSink,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        if !self.running {
            return self.outcome(TickStatus::Idle);
        }

        // 1. Fetch the latest payload
        let payload = match source.latest() {
            Ok(Some(payload)) => {
                self.consecutive_failures = 0;
                payload
            }
            Ok(None) => {
                self.consecutive_failures = 0;
                sink.emit(&AppEvent::NoReading);
                return self.outcome(TickStatus::NoReading);
            }
            Err(error) => return self.source_failed(error, sink),
        };

        // 2. Validate under the configured policy
        let reading = match Reading::from_payload(&payload, self.config.validation) {
            Ok(reading) => reading,
            Err(error) => {
                warn!("Reading rejected: {error}");
                self.stats.readings_rejected += 1;
                sink.emit(&AppEvent::ReadingRejected(error));
                return self.outcome(TickStatus::ReadingRejected(error));
            }
        };

        // 3. Evaluate
        let decision = self.engine.evaluate(&reading);
        self.stats.decisions_made += 1;

        // 4. Execute actions
        self.execute_actions(&decision, &reading, now, devices, alerts, sink);

        // 5. Regular alert, rate-limited per level
        if decision.alert_level != AlertLevel::Safe {
            self.send_alert(&decision, &reading, now, alerts, sink);
        }

        // 6. Keep last known good
        sink.emit(&AppEvent::DecisionMade(DecisionSummary::from(&decision)));
        let level = decision.alert_level;
        self.last_reading = Some(reading);
        self.last_decision = Some(decision);

        self.outcome(TickStatus::Decided(level))
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.
    ///
    /// Manual device failures and invalid configs are returned to the caller
    /// as well as emitted, since a user is waiting on the answer.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now: DateTime<Utc>,
        devices: &mut impl DeviceActuator,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::ManualControl {
                device,
                on,
                intensity,
            } => {
                let command = DeviceCommand {
                    device,
                    on,
                    intensity: intensity.min(MAX_INTENSITY),
                    reason: MANUAL_REASON.to_owned(),
                    issued_at: now,
                };
                self.dispatch(&command, devices, sink)?;
            }
            AppCommand::ResetCooldowns => {
                self.cooldown.reset();
                sink.emit(&AppEvent::CooldownsReset);
            }
            AppCommand::UpdateConfig(new_config) => {
                new_config.validate()?;
                if new_config.alert_cooldown_secs != self.config.alert_cooldown_secs {
                    self.cooldown = AlertCooldown::new(new_config.alert_cooldown_secs);
                }
                self.config = new_config;
                sink.emit(&AppEvent::ConfigUpdated);
                info!("Configuration updated at runtime");
            }
            AppCommand::Start => self.start(now, sink),
            AppCommand::Stop => self.stop(sink),
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Counters, uptime, loop state and engine statistics.
    pub fn report(&self, now: DateTime<Utc>) -> ServiceReport {
        ServiceReport::collect(
            self.stats,
            self.started_at,
            self.running,
            self.consecutive_failures,
            self.last_decision.as_ref().map(|d| d.created_at),
            self.engine.statistics(),
            now,
        )
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    pub fn last_reading(&self) -> Option<&Reading> {
        self.last_reading.as_ref()
    }

    pub fn last_decision(&self) -> Option<&Decision> {
        self.last_decision.as_ref()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<DecisionEngine> {
        &self.engine
    }

    /// Delay before the next tick given the current failure streak.
    ///
    /// `interval × 2^failures`, capped at `max_backoff_secs`.
    pub fn next_check_secs(&self) -> u32 {
        let interval = self.config.check_interval_secs;
        if self.consecutive_failures == 0 {
            return interval;
        }
        let factor = 1u32
            .checked_shl(self.consecutive_failures)
            .unwrap_or(u32::MAX);
        interval
            .saturating_mul(factor)
            .min(self.config.max_backoff_secs)
    }

    // ── Internal ──────────────────────────────────────────────

    fn outcome(&self, status: TickStatus) -> TickOutcome {
        TickOutcome {
            status,
            next_check_secs: self.next_check_secs(),
        }
    }

    fn source_failed(&mut self, error: SourceError, sink: &mut impl EventSink) -> TickOutcome {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.stats.source_failures += 1;
        let retry_in_secs = self.next_check_secs();
        warn!(
            "Sensor source failed ({error}), {} in a row, retry in {retry_in_secs}s",
            self.consecutive_failures
        );
        sink.emit(&AppEvent::SourceFailed {
            error,
            consecutive: self.consecutive_failures,
            retry_in_secs,
        });
        TickOutcome {
            status: TickStatus::SourceFailed(error),
            next_check_secs: retry_in_secs,
        }
    }

    fn execute_actions(
        &mut self,
        decision: &Decision,
        reading: &Reading,
        now: DateTime<Utc>,
        devices: &mut impl DeviceActuator,
        alerts: &mut impl AlertSink,
        sink: &mut impl EventSink,
    ) {
        for action in decision.actions.iter() {
            match action {
                Action::FanOn | Action::FanOff => {
                    let on = action == Action::FanOn;
                    let command = DeviceCommand {
                        device: Device::Fan,
                        on,
                        intensity: if on {
                            self.config.fan_intensity.intensity(reading.temperature)
                        } else {
                            0
                        },
                        reason: format!(
                            "{} (risk {:.3})",
                            decision.alert_level, decision.reasoning.combined_risk_score
                        ),
                        issued_at: now,
                    };
                    // Reported through the sink; the tick carries on.
                    let _ = self.dispatch(&command, devices, sink);
                }
                Action::EmergencyAlert => match alerts.send_emergency(decision, reading) {
                    Ok(()) => {
                        self.stats.emergencies_sent += 1;
                        self.stats.actions_executed += 1;
                        sink.emit(&AppEvent::EmergencySent(decision.alert_level));
                    }
                    Err(error) => {
                        self.stats.alert_failures += 1;
                        warn!("Emergency alert failed: {error}");
                        sink.emit(&AppEvent::EmergencyFailed(error));
                    }
                },
                Action::Notify => {
                    self.stats.notifications += 1;
                    self.stats.actions_executed += 1;
                    sink.emit(&AppEvent::Notified(decision.alert_level));
                }
                Action::None => {}
            }
        }
    }

    fn send_alert(
        &mut self,
        decision: &Decision,
        reading: &Reading,
        now: DateTime<Utc>,
        alerts: &mut impl AlertSink,
        sink: &mut impl EventSink,
    ) {
        let level = decision.alert_level;
        if !self.cooldown.allows(level, now) {
            self.stats.alerts_suppressed += 1;
            sink.emit(&AppEvent::AlertSuppressed(level));
            return;
        }
        match alerts.send_alert(decision, reading) {
            Ok(()) => {
                self.cooldown.record(level, now);
                self.stats.alerts_sent += 1;
                sink.emit(&AppEvent::AlertSent(level));
            }
            Err(error) => {
                self.stats.alert_failures += 1;
                warn!("Alert ({level}) failed: {error}");
                sink.emit(&AppEvent::AlertFailed { level, error });
            }
        }
    }

    fn dispatch(
        &mut self,
        command: &DeviceCommand,
        devices: &mut impl DeviceActuator,
        sink: &mut impl EventSink,
    ) -> core::result::Result<(), DeviceError> {
        match devices.execute(command).and_then(DeviceResponse::into_result) {
            Ok(()) => {
                self.stats.actions_executed += 1;
                sink.emit(&AppEvent::DeviceCommanded(command.clone()));
                Ok(())
            }
            Err(error) => {
                self.stats.device_failures += 1;
                warn!("Device {} command failed: {error}", command.device);
                sink.emit(&AppEvent::DeviceCommandFailed {
                    device: command.device,
                    error,
                });
                Err(error)
            }
        }
    }
}
