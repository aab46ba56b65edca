//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, publish them, push them to
//! a dashboard.

use chrono::{DateTime, Utc};

use crate::engine::decision::{ActionSet, AlertLevel, Decision};
use crate::error::ReadingError;

use super::ports::{AlertError, Device, DeviceCommand, DeviceError, SourceError};

/// Structured events emitted by the monitoring core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic checks started.
    Started(DateTime<Utc>),

    /// Periodic checks paused.
    Stopped,

    /// The engine produced a decision.
    DecisionMade(DecisionSummary),

    /// The sensor store had no reading yet.
    NoReading,

    /// The sensor store failed; the next check is delayed.
    SourceFailed {
        error: SourceError,
        consecutive: u32,
        retry_in_secs: u32,
    },

    /// A payload was refused by the validation policy.
    ReadingRejected(ReadingError),

    /// A device accepted a command.
    DeviceCommanded(DeviceCommand),

    /// A device command could not be delivered.
    DeviceCommandFailed { device: Device, error: DeviceError },

    /// A regular alert went out.
    AlertSent(AlertLevel),

    /// A regular alert was held back by its cooldown.
    AlertSuppressed(AlertLevel),

    /// The alert channel refused a regular alert.
    AlertFailed { level: AlertLevel, error: AlertError },

    /// An emergency alert went out.
    EmergencySent(AlertLevel),

    /// The emergency channel refused an alert.
    EmergencyFailed(AlertError),

    /// A notification action was recorded.
    Notified(AlertLevel),

    /// Alert cooldowns were cleared by command.
    CooldownsReset,

    /// Configuration was replaced at runtime.
    ConfigUpdated,
}

/// Compact view of a [`Decision`] suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSummary {
    pub alert_level: AlertLevel,
    pub actions: ActionSet,
    pub combined_risk: f64,
    pub confidence: f64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Decision> for DecisionSummary {
    fn from(d: &Decision) -> Self {
        Self {
            alert_level: d.alert_level,
            actions: d.actions.clone(),
            combined_risk: d.reasoning.combined_risk_score,
            confidence: d.confidence,
            message: d.message.clone(),
            created_at: d.created_at,
        }
    }
}
