//! Port traits: the hexagonal boundary between the monitoring core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (sensor stores, device controllers, notification
//! channels, event sinks) implement these traits.  The
//! [`MonitorService`](super::service::MonitorService) consumes them via
//! generics, so the decision core never touches a transport directly.
//!
//! All port errors are typed; callers must handle every variant explicitly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::decision::Decision;
use crate::reading::{Reading, SensorPayload};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: sensor store → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the service polls this for the most recent reading.
pub trait SensorSource {
    /// The newest payload, or `Ok(None)` when the store has nothing yet.
    fn latest(&mut self) -> Result<Option<SensorPayload>, SourceError>;
}

// ───────────────────────────────────────────────────────────────
// Device port (driven adapter: domain → habitat devices)
// ───────────────────────────────────────────────────────────────

/// Habitat devices that can be switched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Fan,
    Heater,
    Light,
    Humidifier,
}

impl Device {
    pub const ALL: [Self; 4] = [Self::Fan, Self::Heater, Self::Light, Self::Humidifier];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Heater => "heater",
            Self::Light => "light",
            Self::Humidifier => "humidifier",
        }
    }
}

impl core::fmt::Display for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCommand {
    pub device: Device,
    pub on: bool,
    /// 0–100.
    pub intensity: u8,
    pub reason: String,
    pub issued_at: DateTime<Utc>,
}

/// How the controller transport answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum TransportStatus {
    /// Controller acknowledged with its own status code.
    Ok(u16),
    /// Non-success HTTP status.
    Http(u16),
    Timeout,
    ConnectionError,
}

/// Controller answer to a [`DeviceCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceResponse {
    pub success: bool,
    pub status: TransportStatus,
}

impl DeviceResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            status: TransportStatus::Ok(200),
        }
    }

    pub fn failed(status: TransportStatus) -> Self {
        Self {
            success: false,
            status,
        }
    }

    /// Collapse into a typed result.
    pub fn into_result(self) -> Result<(), DeviceError> {
        if self.success {
            return Ok(());
        }
        Err(match self.status {
            TransportStatus::Ok(code) | TransportStatus::Http(code) => {
                DeviceError::Rejected(code)
            }
            TransportStatus::Timeout => DeviceError::Timeout,
            TransportStatus::ConnectionError => DeviceError::Unreachable,
        })
    }
}

/// Write-side port: the service calls this to switch devices.
pub trait DeviceActuator {
    fn execute(&mut self, command: &DeviceCommand) -> Result<DeviceResponse, DeviceError>;
}

// ───────────────────────────────────────────────────────────────
// Alert port (driven adapter: domain → caretaker notifications)
// ───────────────────────────────────────────────────────────────

/// Notification channels.  Regular alerts are rate-limited by the
/// service; emergencies are always delivered.
///
/// Both calls carry the reading snapshot the decision was made from.
pub trait AlertSink {
    fn send_alert(&mut self, decision: &Decision, reading: &Reading) -> Result<(), AlertError>;

    fn send_emergency(&mut self, decision: &Decision, reading: &Reading)
    -> Result<(), AlertError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SensorSource`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// The store did not answer in time.
    Timeout,
    /// The store could not be reached.
    Unavailable,
    /// The store answered with something that is not a payload.
    Malformed,
}

/// Errors from [`DeviceActuator`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    Timeout,
    Unreachable,
    /// The controller refused the command with this status code.
    Rejected(u16),
}

/// Errors from [`AlertSink`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertError {
    /// The channel is down.
    Unavailable,
    /// The channel refused the message.
    Rejected,
}

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file at the given path.
    NotFound,
    /// The document failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error while reading the file.
    IoError,
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Malformed => write!(f, "malformed payload"),
        }
    }
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Unreachable => write!(f, "controller unreachable"),
            Self::Rejected(code) => write!(f, "rejected with status {code}"),
        }
    }
}

impl core::fmt::Display for AlertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "channel unavailable"),
            Self::Rejected => write!(f, "message rejected"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_maps_to_device_error() {
        assert_eq!(DeviceResponse::ok().into_result(), Ok(()));
        assert_eq!(
            DeviceResponse::failed(TransportStatus::Http(503)).into_result(),
            Err(DeviceError::Rejected(503))
        );
        assert_eq!(
            DeviceResponse::failed(TransportStatus::Timeout).into_result(),
            Err(DeviceError::Timeout)
        );
        assert_eq!(
            DeviceResponse::failed(TransportStatus::ConnectionError).into_result(),
            Err(DeviceError::Unreachable)
        );
    }

    #[test]
    fn device_wire_names() {
        let json = serde_json::to_string(&Device::ALL).unwrap();
        assert_eq!(json, r#"["fan","heater","light","humidifier"]"#);
    }
}
