//! Mock adapters for integration tests.
//!
//! Each mock records every call so tests can assert on the full history
//! without touching a real transport.

use std::collections::VecDeque;

use petzone::app::events::AppEvent;
use petzone::app::ports::{
    AlertError, AlertSink, DeviceActuator, DeviceCommand, DeviceError, DeviceResponse, EventSink,
    SensorSource, SourceError,
};
use petzone::engine::decision::{AlertLevel, Decision};
use petzone::reading::{Reading, SensorPayload};

// ── MockSource ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSource {
    pub script: VecDeque<Result<Option<SensorPayload>, SourceError>>,
    pub polls: usize,
}

#[allow(dead_code)]
impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_payload(mut self, payload: SensorPayload) -> Self {
        self.script.push_back(Ok(Some(payload)));
        self
    }

    pub fn then_empty(mut self) -> Self {
        self.script.push_back(Ok(None));
        self
    }

    pub fn then_error(mut self, error: SourceError) -> Self {
        self.script.push_back(Err(error));
        self
    }
}

impl SensorSource for MockSource {
    fn latest(&mut self) -> Result<Option<SensorPayload>, SourceError> {
        self.polls += 1;
        self.script.pop_front().unwrap_or(Ok(None))
    }
}

// ── MockDevices ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDevices {
    pub commands: Vec<DeviceCommand>,
    /// When set, every call fails with this error.
    pub fail: Option<DeviceError>,
}

#[allow(dead_code)]
impl MockDevices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&DeviceCommand> {
        self.commands.last()
    }
}

impl DeviceActuator for MockDevices {
    fn execute(&mut self, command: &DeviceCommand) -> Result<DeviceResponse, DeviceError> {
        if let Some(error) = self.fail {
            return Err(error);
        }
        self.commands.push(command.clone());
        Ok(DeviceResponse::ok())
    }
}

// ── MockAlerts ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockAlerts {
    pub alerts: Vec<AlertLevel>,
    pub emergencies: Vec<String>,
    /// Reading snapshot handed over with each alert or emergency.
    pub snapshots: Vec<Reading>,
    pub fail: Option<AlertError>,
}

#[allow(dead_code)]
impl MockAlerts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlertSink for MockAlerts {
    fn send_alert(&mut self, decision: &Decision, reading: &Reading) -> Result<(), AlertError> {
        if let Some(error) = self.fail {
            return Err(error);
        }
        self.alerts.push(decision.alert_level);
        self.snapshots.push(*reading);
        Ok(())
    }

    fn send_emergency(
        &mut self,
        decision: &Decision,
        reading: &Reading,
    ) -> Result<(), AlertError> {
        if let Some(error) = self.fail {
            return Err(error);
        }
        self.emergencies.push(decision.message.clone());
        self.snapshots.push(*reading);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
